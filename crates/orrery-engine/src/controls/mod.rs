//! Tweak-panel controls.
//!
//! A game declares its controls as static tables of `ControlSpec`s, one table
//! per group. The page builds widgets from `ControlPanel::describe` and writes
//! values back by key; each write is clamped, stored, and applied to the
//! game's parameter state in the same call.

use serde::Serialize;

use crate::error::ControlError;

/// Allowed values for a control. Writes are clamped then snapped to `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlRange {
    pub min: f32,
    pub max: f32,
    /// 0 means continuous.
    pub step: f32,
}

impl ControlRange {
    pub const TOGGLE: ControlRange = ControlRange::new(0.0, 1.0, 1.0);
    /// Packed 0xRRGGBB. Integers below 2^24 are exact in f32.
    pub const COLOR: ControlRange = ControlRange::new(0.0, 16_777_215.0, 1.0);

    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }
}

/// Widget the page should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Slider,
    Toggle,
    Color,
}

/// One control: where it lives, what it accepts, and what it does.
pub struct ControlSpec<S> {
    pub key: &'static str,
    pub group: &'static str,
    pub label: &'static str,
    pub kind: ControlKind,
    pub range: ControlRange,
    pub default: f32,
    pub apply: fn(&mut S, f32),
}

// Manual impls: `S` itself need not be Clone.
impl<S> Clone for ControlSpec<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ControlSpec<S> {}

impl<S> ControlSpec<S> {
    pub const fn slider(
        key: &'static str,
        group: &'static str,
        label: &'static str,
        range: ControlRange,
        default: f32,
        apply: fn(&mut S, f32),
    ) -> Self {
        Self { key, group, label, kind: ControlKind::Slider, range, default, apply }
    }

    pub const fn toggle(
        key: &'static str,
        group: &'static str,
        label: &'static str,
        default: bool,
        apply: fn(&mut S, f32),
    ) -> Self {
        Self {
            key,
            group,
            label,
            kind: ControlKind::Toggle,
            range: ControlRange::TOGGLE,
            default: if default { 1.0 } else { 0.0 },
            apply,
        }
    }

    pub const fn color(
        key: &'static str,
        group: &'static str,
        label: &'static str,
        default: u32,
        apply: fn(&mut S, f32),
    ) -> Self {
        Self {
            key,
            group,
            label,
            kind: ControlKind::Color,
            range: ControlRange::COLOR,
            default: default as f32,
            apply,
        }
    }
}

/// Widget description sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlDescription {
    pub index: usize,
    pub key: &'static str,
    pub group: &'static str,
    pub label: &'static str,
    pub kind: ControlKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
    pub value: f32,
}

/// Live values of a set of controls bound to state `S`.
pub struct ControlPanel<S> {
    specs: Vec<ControlSpec<S>>,
    values: Vec<f32>,
}

impl<S> ControlPanel<S> {
    pub fn new(specs: Vec<ControlSpec<S>>) -> Self {
        let values = specs.iter().map(|s| s.range.clamp(s.default)).collect();
        Self { specs, values }
    }

    /// Build a panel from several group tables, in order.
    pub fn from_groups(groups: &[&[ControlSpec<S>]]) -> Self {
        Self::new(groups.iter().flat_map(|g| g.iter().copied()).collect())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.key == key)
    }

    pub fn group_of(&self, key: &str) -> Option<&'static str> {
        self.specs.iter().find(|s| s.key == key).map(|s| s.group)
    }

    pub fn group_at(&self, index: usize) -> Option<&'static str> {
        self.specs.get(index).map(|s| s.group)
    }

    /// Write a control by key. Returns the value actually applied.
    pub fn set(&mut self, state: &mut S, key: &str, value: f32) -> Result<f32, ControlError> {
        let index = self
            .index_of(key)
            .ok_or_else(|| ControlError::UnknownKey(key.to_string()))?;
        self.set_index(state, index, value)
    }

    /// Write a control by position in the panel.
    pub fn set_index(&mut self, state: &mut S, index: usize, value: f32) -> Result<f32, ControlError> {
        let spec = self.specs.get(index).ok_or(ControlError::UnknownIndex(index))?;
        if !value.is_finite() {
            return Err(ControlError::NotFinite(spec.key.to_string()));
        }
        let applied = spec.range.clamp(value);
        (spec.apply)(state, applied);
        self.values[index] = applied;
        log::debug!("control {} = {}", spec.key, applied);
        Ok(applied)
    }

    pub fn value(&self, key: &str) -> Option<f32> {
        self.index_of(key).map(|i| self.values[i])
    }

    /// Reset every control to its default and apply it.
    pub fn apply_defaults(&mut self, state: &mut S) {
        for (spec, value) in self.specs.iter().zip(self.values.iter_mut()) {
            *value = spec.range.clamp(spec.default);
            (spec.apply)(state, *value);
        }
    }

    /// Controls in one group, in panel order.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ControlSpec<S>> + 'a {
        self.specs.iter().filter(move |s| s.group == group)
    }

    pub fn describe(&self) -> Vec<ControlDescription> {
        self.specs
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(index, (s, &value))| ControlDescription {
                index,
                key: s.key,
                group: s.group,
                label: s.label,
                kind: s.kind,
                min: s.range.min,
                max: s.range.max,
                step: s.range.step,
                default: s.default,
                value,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Unpack a color control value into linear-ish 0..1 RGB.
pub fn unpack_rgb(value: f32) -> [f32; 3] {
    let packed = value.clamp(0.0, 16_777_215.0) as u32;
    [
        ((packed >> 16) & 0xff) as f32 / 255.0,
        ((packed >> 8) & 0xff) as f32 / 255.0,
        (packed & 0xff) as f32 / 255.0,
    ]
}

pub fn is_on(value: f32) -> bool {
    value >= 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Params {
        strength: f32,
        glow: bool,
        tint: [f32; 3],
    }

    const BLOOM: &[ControlSpec<Params>] = &[
        ControlSpec::slider("bloom.strength", "bloom", "Strength", ControlRange::new(0.0, 3.0, 0.1), 1.5, |p: &mut Params, v: f32| p.strength = v),
        ControlSpec::toggle("bloom.sun", "bloom", "Sun glow", true, |p: &mut Params, v: f32| p.glow = is_on(v)),
    ];
    const SCENE: &[ControlSpec<Params>] = &[
        ControlSpec::color("scene.tint", "scene", "Background", 0xff8000, |p: &mut Params, v: f32| p.tint = unpack_rgb(v)),
    ];

    fn panel() -> ControlPanel<Params> {
        ControlPanel::from_groups(&[BLOOM, SCENE])
    }

    #[test]
    fn range_clamps_then_snaps() {
        let r = ControlRange::new(0.0, 3.0, 0.5);
        assert_eq!(r.clamp(9.0), 3.0);
        assert_eq!(r.clamp(-1.0), 0.0);
        assert_eq!(r.clamp(1.3), 1.5);
        assert_eq!(ControlRange::new(1.0, 2.0, 0.0).clamp(1.234), 1.234);
    }

    #[test]
    fn set_applies_clamped_value() {
        let mut panel = panel();
        let mut params = Params::default();
        let applied = panel.set(&mut params, "bloom.strength", 7.0).unwrap();
        assert_eq!(applied, 3.0);
        assert_eq!(params.strength, 3.0);
        assert_eq!(panel.value("bloom.strength"), Some(3.0));
    }

    #[test]
    fn unknown_key_and_nan_are_rejected() {
        let mut panel = panel();
        let mut params = Params::default();
        assert_eq!(
            panel.set(&mut params, "bloom.gain", 1.0),
            Err(ControlError::UnknownKey("bloom.gain".into()))
        );
        assert_eq!(
            panel.set(&mut params, "bloom.strength", f32::NAN),
            Err(ControlError::NotFinite("bloom.strength".into()))
        );
        assert_eq!(panel.set_index(&mut params, 42, 1.0), Err(ControlError::UnknownIndex(42)));
        assert_eq!(params.strength, 0.0);
    }

    #[test]
    fn apply_defaults_writes_every_control() {
        let mut panel = panel();
        let mut params = Params::default();
        panel.set(&mut params, "bloom.strength", 0.2).unwrap();
        panel.apply_defaults(&mut params);
        assert_eq!(params.strength, 1.5);
        assert!(params.glow);
        assert_eq!(params.tint, [1.0, 128.0 / 255.0, 0.0]);
        assert_eq!(panel.value("bloom.strength"), Some(1.5));
    }

    #[test]
    fn describe_lists_widgets_in_order() {
        let panel = panel();
        let desc = panel.describe();
        assert_eq!(desc.len(), 3);
        assert_eq!(desc[1].kind, ControlKind::Toggle);
        assert_eq!(desc[2].group, "scene");
        assert_eq!(desc[2].index, 2);
        let json = serde_json::to_string(&desc).unwrap();
        assert!(json.contains("\"kind\":\"color\""));
    }

    #[test]
    fn group_filters_by_group() {
        let panel = panel();
        assert_eq!(panel.group("bloom").count(), 2);
        assert_eq!(panel.group_of("scene.tint"), Some("scene"));
        assert_eq!(panel.group_of("scene.fog"), None);
    }
}
