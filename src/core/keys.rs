// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host key enumeration
//!
//! The engine never talks to the platform directly. At startup it asks a
//! `ControlSource` for the raw key/button codes and their names, and builds
//! the dense control table from that. `VirtualKeySource` is the built-in
//! source covering the 256 Windows virtual-key codes.
//!
//! # Reserved codes
//! Bare modifier keys (both sides of Shift/Ctrl/Alt, both Windows keys) and
//! the `None` sentinel keep their slot in the table but are never bindable.
//! The generic `ShiftKey`, `ControlKey` and `Menu` codes remain bindable, so
//! combos like `Control+Shift+X` are expressed with those.

/// Number of raw codes a source may report (`0..=255`).
pub const RAW_CODE_COUNT: usize = 256;

/// Codes that occupy a table slot but can never be looked up or bound.
pub const RESERVED_CODES: &[u8] = &[
    0x00, // None
    0x5B, // LWin
    0x5C, // RWin
    0xA0, // LShiftKey
    0xA1, // RShiftKey
    0xA2, // LControlKey
    0xA3, // RControlKey
    0xA4, // LMenu
    0xA5, // RMenu
];

/// One entry of the host's raw enumeration.
#[derive(Clone, Debug, PartialEq)]
pub struct RawControl {
    /// Raw platform code, used as the control index.
    pub code: u8,
    /// Canonical name, used for persistence.
    pub name: String,
    /// Short human-facing name, also accepted by name lookup.
    pub display_name: Option<String>,
}

/// Provides the platform's key/button enumeration at registry build time.
pub trait ControlSource {
    fn raw_controls(&self) -> Vec<RawControl>;
}

/// Windows virtual-key codes with .NET-style canonical names.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualKeySource;

impl ControlSource for VirtualKeySource {
    fn raw_controls(&self) -> Vec<RawControl> {
        let mut controls = Vec::with_capacity(RAW_CODE_COUNT);

        for &(code, name, display) in NAMED_KEYS {
            controls.push(RawControl {
                code,
                name: name.to_string(),
                display_name: display.map(str::to_string),
            });
        }

        for (offset, letter) in ('A'..='Z').enumerate() {
            controls.push(RawControl {
                code: 0x41 + offset as u8,
                name: letter.to_string(),
                display_name: None,
            });
        }

        for digit in 0..10u8 {
            controls.push(RawControl {
                code: 0x30 + digit,
                name: format!("D{}", digit),
                display_name: Some(digit.to_string()),
            });
            controls.push(RawControl {
                code: 0x60 + digit,
                name: format!("NumPad{}", digit),
                display_name: Some(format!("Num{}", digit)),
            });
        }

        for n in 1..=24u8 {
            controls.push(RawControl {
                code: 0x6F + n,
                name: format!("F{}", n),
                display_name: None,
            });
        }

        controls.sort_by_key(|c| c.code);
        controls
    }
}

/// Named codes outside the letter/digit/function-key ranges.
///
/// Display names must not contain `+`, it separates controls in combo strings.
const NAMED_KEYS: &[(u8, &str, Option<&str>)] = &[
    (0x00, "None", None),
    (0x01, "LButton", Some("Mouse1")),
    (0x02, "RButton", Some("Mouse2")),
    (0x03, "Cancel", None),
    (0x04, "MButton", Some("Mouse3")),
    (0x05, "XButton1", Some("Mouse4")),
    (0x06, "XButton2", Some("Mouse5")),
    (0x08, "Back", Some("Backspace")),
    (0x09, "Tab", None),
    (0x0C, "Clear", None),
    (0x0D, "Return", Some("Enter")),
    (0x10, "ShiftKey", Some("Shift")),
    (0x11, "ControlKey", Some("Ctrl")),
    (0x12, "Menu", Some("Alt")),
    (0x13, "Pause", None),
    (0x14, "Capital", Some("CapsLock")),
    (0x15, "KanaMode", None),
    (0x17, "JunjaMode", None),
    (0x18, "FinalMode", None),
    (0x19, "KanjiMode", None),
    (0x1B, "Escape", Some("Esc")),
    (0x1C, "IMEConvert", None),
    (0x1D, "IMENonconvert", None),
    (0x1E, "IMEAccept", None),
    (0x1F, "IMEModeChange", None),
    (0x20, "Space", None),
    (0x21, "Prior", Some("PageUp")),
    (0x22, "Next", Some("PageDown")),
    (0x23, "End", None),
    (0x24, "Home", None),
    (0x25, "Left", None),
    (0x26, "Up", None),
    (0x27, "Right", None),
    (0x28, "Down", None),
    (0x29, "Select", None),
    (0x2A, "Print", None),
    (0x2B, "Execute", None),
    (0x2C, "Snapshot", Some("PrintScreen")),
    (0x2D, "Insert", Some("Ins")),
    (0x2E, "Delete", Some("Del")),
    (0x2F, "Help", None),
    (0x5B, "LWin", None),
    (0x5C, "RWin", None),
    (0x5D, "Apps", Some("ContextMenu")),
    (0x5F, "Sleep", None),
    (0x6A, "Multiply", Some("NumMultiply")),
    (0x6B, "Add", Some("NumAdd")),
    (0x6C, "Separator", None),
    (0x6D, "Subtract", Some("NumSubtract")),
    (0x6E, "Decimal", Some("NumDecimal")),
    (0x6F, "Divide", Some("NumDivide")),
    (0x90, "NumLock", None),
    (0x91, "Scroll", Some("ScrollLock")),
    (0xA0, "LShiftKey", None),
    (0xA1, "RShiftKey", None),
    (0xA2, "LControlKey", None),
    (0xA3, "RControlKey", None),
    (0xA4, "LMenu", None),
    (0xA5, "RMenu", None),
    (0xA6, "BrowserBack", None),
    (0xA7, "BrowserForward", None),
    (0xA8, "BrowserRefresh", None),
    (0xA9, "BrowserStop", None),
    (0xAA, "BrowserSearch", None),
    (0xAB, "BrowserFavorites", None),
    (0xAC, "BrowserHome", None),
    (0xAD, "VolumeMute", None),
    (0xAE, "VolumeDown", None),
    (0xAF, "VolumeUp", None),
    (0xB0, "MediaNextTrack", None),
    (0xB1, "MediaPreviousTrack", None),
    (0xB2, "MediaStop", None),
    (0xB3, "MediaPlayPause", None),
    (0xB4, "LaunchMail", None),
    (0xB5, "SelectMedia", None),
    (0xB6, "LaunchApplication1", None),
    (0xB7, "LaunchApplication2", None),
    (0xBA, "OemSemicolon", Some(";")),
    (0xBB, "Oemplus", Some("=")),
    (0xBC, "Oemcomma", Some(",")),
    (0xBD, "OemMinus", Some("-")),
    (0xBE, "OemPeriod", Some(".")),
    (0xBF, "OemQuestion", Some("/")),
    (0xC0, "Oemtilde", Some("`")),
    (0xDB, "OemOpenBrackets", Some("[")),
    (0xDC, "OemPipe", Some("\\")),
    (0xDD, "OemCloseBrackets", Some("]")),
    (0xDE, "OemQuotes", Some("'")),
    (0xDF, "Oem8", None),
    (0xE2, "OemBackslash", None),
    (0xE5, "ProcessKey", None),
    (0xE7, "Packet", None),
    (0xF6, "Attn", None),
    (0xF7, "Crsel", None),
    (0xF8, "Exsel", None),
    (0xF9, "EraseEof", None),
    (0xFA, "Play", None),
    (0xFB, "Zoom", None),
    (0xFC, "NoName", None),
    (0xFD, "Pa1", None),
    (0xFE, "OemClear", None),
];
