use std::collections::BTreeMap;

use tracing::debug;

use crate::layer::LayerKey;

/// Engine-side effect of a visibility change.
pub trait LayerSink {
    fn set_layer_shown(&mut self, key: &LayerKey, shown: bool);
}

/// Shown/hidden state per loaded layer.
///
/// Entries appear when a layer finishes loading and are never removed.
/// Unknown keys read as visible.
#[derive(Debug, Default, Clone)]
pub struct LayerVisibility {
    state: BTreeMap<LayerKey, bool>,
}

impl LayerVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `key` finished loading. A layer hidden while it was still
    /// loading stays hidden and `sink` is told to hide the fresh handle.
    /// Returns whether a new entry was created.
    pub fn register_loaded<S: LayerSink + ?Sized>(
        &mut self,
        key: LayerKey,
        sink: &mut S,
    ) -> bool {
        match self.state.get(&key) {
            Some(true) => false,
            Some(false) => {
                debug!(%key, "layer loaded hidden");
                sink.set_layer_shown(&key, false);
                false
            }
            None => {
                debug!(%key, "layer loaded");
                self.state.insert(key, true);
                true
            }
        }
    }

    /// Updates the state and notifies `sink` only if the effective value changed.
    pub fn set_visible<S: LayerSink + ?Sized>(
        &mut self,
        key: &LayerKey,
        visible: bool,
        sink: &mut S,
    ) -> bool {
        let previous = self.is_visible(key.as_str());
        self.state.insert(key.clone(), visible);
        if previous == visible {
            return false;
        }
        debug!(%key, visible, "layer visibility changed");
        sink.set_layer_shown(key, visible);
        true
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.state.get(key).copied().unwrap_or(true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

#[cfg(test)]
impl LayerSink for Vec<(LayerKey, bool)> {
    fn set_layer_shown(&mut self, key: &LayerKey, shown: bool) {
        self.push((key.clone(), shown));
    }
}

#[cfg(test)]
mod tests {
    use super::LayerVisibility;
    use crate::layer::LayerKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_key_defaults_to_visible() {
        let v = LayerVisibility::new();
        assert!(v.is_visible("ion-1"));
        assert!(!v.contains("ion-1"));
    }

    #[test]
    fn register_creates_visible_entry_once() {
        let mut v = LayerVisibility::new();
        let mut sink: Vec<(LayerKey, bool)> = Vec::new();
        let key = LayerKey::for_url("/BIM-GIS/data/EjeDrenesPaq3.geojson");
        assert!(v.register_loaded(key.clone(), &mut sink));
        assert!(!v.register_loaded(key.clone(), &mut sink));
        assert!(v.is_visible(key.as_str()));
        assert_eq!(v.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn toggle_emits_one_effect_per_change() {
        let mut v = LayerVisibility::new();
        let mut sink: Vec<(LayerKey, bool)> = Vec::new();
        let key = LayerKey::for_ion_asset(3326798);
        v.register_loaded(key.clone(), &mut sink);

        assert!(v.set_visible(&key, false, &mut sink));
        assert!(!v.set_visible(&key, false, &mut sink));
        assert!(v.set_visible(&key, true, &mut sink));

        assert_eq!(sink, vec![(key.clone(), false), (key, true)]);
    }

    #[test]
    fn setting_default_value_on_unknown_key_is_silent() {
        let mut v = LayerVisibility::new();
        let mut sink: Vec<(LayerKey, bool)> = Vec::new();
        let key = LayerKey::for_ion_asset(9);
        assert!(!v.set_visible(&key, true, &mut sink));
        assert!(sink.is_empty());
        assert!(v.contains(key.as_str()));
    }

    #[test]
    fn hide_before_load_is_applied_to_loaded_handle() {
        let mut v = LayerVisibility::new();
        let mut toggles: Vec<(LayerKey, bool)> = Vec::new();
        let key = LayerKey::for_ion_asset(3326380);
        v.set_visible(&key, false, &mut toggles);

        let mut loads: Vec<(LayerKey, bool)> = Vec::new();
        assert!(!v.register_loaded(key.clone(), &mut loads));
        assert!(!v.is_visible(key.as_str()));
        assert_eq!(loads, vec![(key, false)]);
    }

    #[test]
    fn show_before_load_needs_no_replay() {
        let mut v = LayerVisibility::new();
        let mut sink: Vec<(LayerKey, bool)> = Vec::new();
        let key = LayerKey::for_url("/BIM-GIS/data/TanquesRetencion.geojson");
        v.set_visible(&key, false, &mut sink);
        v.set_visible(&key, true, &mut sink);
        sink.clear();

        v.register_loaded(key.clone(), &mut sink);
        assert!(sink.is_empty());
        assert!(v.is_visible(key.as_str()));
    }
}
