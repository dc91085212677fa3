//! Shared helpers: a single group driven tick by tick.

use crate::config::EngineConfig;
use crate::core::{
    BindGroup, BindId, ControlId, ControlRegistry, ControlSample, Tick,
};

/// Frame length used by `tick()`.
pub const FRAME_MS: u64 = 16;

pub struct Harness {
    pub controls: ControlRegistry,
    pub group: BindGroup,
    pub frame: u64,
    pub elapsed_ms: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            controls: ControlRegistry::new(),
            group: BindGroup::new("test", &EngineConfig::default()),
            frame: 0,
            elapsed_ms: 0,
        }
    }

    pub fn id(&self, name: &str) -> ControlId {
        self.controls
            .lookup_by_name(name)
            .unwrap_or_else(|| panic!("unknown control {}", name))
    }

    pub fn ids(&self, names: &[&str]) -> Vec<ControlId> {
        names.iter().map(|n| self.id(n)).collect()
    }

    /// Registers a bind and assigns its primary combo strictly.
    pub fn bind(&mut self, name: &str, controls: &[&str]) -> BindId {
        let bind = self.group.register_bind(name).unwrap();
        let ids = self.ids(controls);
        self.group.set_combo(bind, 0, &ids, true).unwrap();
        bind
    }

    /// Advances one frame with exactly `pressed` held down.
    pub fn tick(&mut self, pressed: &[&str]) {
        let at = self.elapsed_ms + FRAME_MS;
        self.tick_at(at, pressed);
    }

    /// Runs a frame at an absolute time.
    pub fn tick_at(&mut self, elapsed_ms: u64, pressed: &[&str]) {
        let ids = self.ids(pressed);
        self.controls.refresh_pressed(&ids);
        self.run(elapsed_ms);
    }

    /// Advances one frame with explicit samples; unlisted controls are up.
    pub fn tick_samples(&mut self, samples: &[(&str, ControlSample)]) {
        let resolved: Vec<(ControlId, ControlSample)> =
            samples.iter().map(|(n, s)| (self.id(n), *s)).collect();
        self.controls.refresh(&mut |control: &crate::core::Control| {
            resolved
                .iter()
                .find(|(id, _)| id.index() == control.index())
                .map(|(_, sample)| *sample)
                .unwrap_or_default()
        });
        let at = self.elapsed_ms + FRAME_MS;
        self.run(at);
    }

    fn run(&mut self, elapsed_ms: u64) {
        self.frame += 1;
        self.elapsed_ms = elapsed_ms;
        self.group
            .update(&self.controls, Tick::from_millis(self.frame, elapsed_ms));
    }

    pub fn pressed(&self, bind: BindId) -> bool {
        self.group.bind(bind).is_pressed()
    }
}
