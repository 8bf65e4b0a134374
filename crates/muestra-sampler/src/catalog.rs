//! Injected catalog of embedded preset resources.
//!
//! The engine never touches a process-wide resource table; whoever
//! constructs it hands over the list of named WAV byte buffers. The
//! catalog is read-only after construction.

use std::borrow::Cow;

/// One named WAV resource.
#[derive(Debug, Clone)]
pub struct PresetResource {
    name: String,
    data: Cow<'static, [u8]>,
}

impl PresetResource {
    /// Create a resource from an owned byte buffer.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: Cow::Owned(data),
        }
    }

    /// Create a resource over embedded bytes (`include_bytes!` output).
    pub fn from_static(name: impl Into<String>, data: &'static [u8]) -> Self {
        Self {
            name: name.into(),
            data: Cow::Borrowed(data),
        }
    }

    /// Raw resource name as injected.
    pub fn raw_name(&self) -> &str {
        &self.name
    }

    /// Human-facing name: underscores become spaces, a trailing `.wav` or
    /// `wav` suffix is removed, surrounding whitespace is trimmed.
    pub fn display_name(&self) -> String {
        let mut name = self.name.replace('_', " ");
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".wav") {
            name.truncate(name.len() - 4);
        } else if lower.ends_with("wav") {
            name.truncate(name.len() - 3);
        }
        name.trim().to_string()
    }

    /// Resource bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Read-only, index-addressed list of preset resources.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    resources: Vec<PresetResource>,
}

impl PresetCatalog {
    /// Build a catalog from the injected resource list.
    pub fn new(resources: Vec<PresetResource>) -> Self {
        Self { resources }
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True if no presets were injected.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resource at `index`, or `None` out of range.
    pub fn get(&self, index: usize) -> Option<&PresetResource> {
        self.resources.get(index)
    }

    /// Display names for the host's enumerated preset choice.
    pub fn display_names(&self) -> Vec<String> {
        self.resources.iter().map(PresetResource::display_name).collect()
    }
}
