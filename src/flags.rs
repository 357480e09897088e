#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFlags {
    pub supports_vr: bool,
    pub supports_vr_chromium: bool,
    pub unity_loaded: bool,
    pub vr_loaded: bool,
    pub vr_presenting: bool,
}

impl PageFlags {
    /// Dataset keys (camelCase, as `DOMStringMap` expects) and the value each
    /// should carry. `None` means the attribute is removed: page CSS matches
    /// on presence (`[data-vr-loaded]`), so only `vrPresenting` ever reads
    /// `"false"`.
    pub fn dataset_entries(&self) -> [(&'static str, Option<&'static str>); 5] {
        let present = |flag: bool| flag.then_some("true");
        [
            ("supportsVr", present(self.supports_vr)),
            ("supportsVrChromium", present(self.supports_vr_chromium)),
            ("unityLoaded", present(self.unity_loaded)),
            ("vrLoaded", present(self.vr_loaded)),
            (
                "vrPresenting",
                Some(if self.vr_presenting { "true" } else { "false" }),
            ),
        ]
    }
}
