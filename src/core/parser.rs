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

//! src/core/parser.rs
//!
//! Text formats for combos and recorded input
//!
//! This module parses two small formats:
//! - Combo strings: `Control+Shift+X`, control names separated by `+`
//! - Input scripts: one frame per line, `<elapsed_ms> <controls>` where
//!   `<controls>` is a combo string or `-` for "nothing pressed". Analog
//!   controls take an optional magnitude suffix, e.g. `ScrollUp*2.5`.
//!   Lines starting with `#` are comments.
//!
//! # Architecture
//! The parser uses nom combinators and only produces names. Resolving names
//! against a `ControlRegistry` is a separate step, so parse errors (bad
//! syntax) and lookup errors (unknown control) stay distinct.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, verify},
    multi::separated_list1,
    number::complete::float,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::control::{ControlRegistry, ControlSample};
use crate::core::error::BindError;
use crate::core::types::ControlId;

/// Parse errors with line number context
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid combo '{input}': {message}")]
    InvalidCombo { input: String, message: String },

    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Line {line}: time {elapsed_ms}ms is earlier than the previous frame")]
    TimeWentBackwards { line: usize, elapsed_ms: u64 },
}

/// One control entry of a script frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptInput {
    pub name: String,
    /// Analog magnitude, `None` for a plain press.
    pub magnitude: Option<f32>,
}

/// Controls held at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptFrame {
    pub elapsed_ms: u64,
    pub inputs: Vec<ScriptInput>,
}

impl ScriptFrame {
    /// Resolves every input name into a sample for the registry.
    pub fn resolve(
        &self,
        controls: &ControlRegistry,
    ) -> Result<Vec<(ControlId, ControlSample)>, BindError> {
        self.inputs
            .iter()
            .map(|input| {
                let id = controls
                    .lookup_by_name(&input.name)
                    .ok_or_else(|| BindError::UnknownControl(input.name.clone()))?;
                let sample = match input.magnitude {
                    Some(magnitude) => ControlSample::analog(magnitude),
                    None => ControlSample::pressed(),
                };
                Ok((id, sample))
            })
            .collect()
    }
}

/// Parse a combo string into control names
///
/// An empty (or whitespace-only) string is the unbound combo.
///
/// # Example
/// ```
/// use bind_engine::core::parser::parse_combo;
///
/// let names = parse_combo("ControlKey + ShiftKey + X")?;
/// assert_eq!(names, vec!["ControlKey", "ShiftKey", "X"]);
/// # Ok::<(), bind_engine::core::parser::ParseError>(())
/// ```
pub fn parse_combo(input: &str) -> Result<Vec<String>, ParseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    all_consuming(separated_list1(char('+'), control_name))
        .parse(input)
        .map(|(_, names)| names.into_iter().map(str::to_string).collect())
        .map_err(|e| ParseError::InvalidCombo {
            input: input.to_string(),
            message: format!("{:?}", e),
        })
}

/// Parse a complete input script
///
/// Frame times must not decrease from one line to the next.
pub fn parse_script(content: &str) -> Result<Vec<ScriptFrame>, ParseError> {
    let mut frames: Vec<ScriptFrame> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;

        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        let frame = match all_consuming(parse_script_line).parse(line_trimmed) {
            Ok((_, frame)) => frame,
            Err(e) => {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: format!("{:?}", e),
                });
            }
        };

        if let Some(previous) = frames.last() {
            if frame.elapsed_ms < previous.elapsed_ms {
                return Err(ParseError::TimeWentBackwards {
                    line: line_num,
                    elapsed_ms: frame.elapsed_ms,
                });
            }
        }

        frames.push(frame);
    }

    Ok(frames)
}

/// Parse a single script line
///
/// Format: `<elapsed_ms> <input>[+<input>...]` or `<elapsed_ms> -`
pub fn parse_script_line(input: &str) -> IResult<&str, ScriptFrame> {
    let (input, elapsed_ms) = map_res(digit1, |s: &str| s.parse::<u64>()).parse(input)?;
    let (input, _) = space1(input)?;
    let (input, inputs) = alt((
        map((char('-'), space0), |_| Vec::<ScriptInput>::new()),
        separated_list1(char('+'), parse_script_input),
    ))
    .parse(input)?;

    Ok((input, ScriptFrame { elapsed_ms, inputs }))
}

/// Parse `Name` or `Name*magnitude`
fn parse_script_input(input: &str) -> IResult<&str, ScriptInput> {
    map(
        (control_name, opt(preceded(char('*'), float))),
        |(name, magnitude)| ScriptInput {
            name: name.to_string(),
            magnitude,
        },
    )
    .parse(input)
}

/// A control name, surrounding whitespace stripped
fn control_name(input: &str) -> IResult<&str, &str> {
    verify(
        map(take_while1(|c: char| c != '+' && c != '*'), str::trim),
        |name: &str| !name.is_empty(),
    )
    .parse(input)
}
