use shared::domain::{IconVariant, ICON_BASE_CLASS};

/// Class set of the energy icon element.
///
/// Holds the base class, at most one [`IconVariant`] class, and any unrelated
/// classes the markup declared (sizing, spacing, ...), in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconElement {
    classes: Vec<String>,
}

impl IconElement {
    pub fn new() -> Self {
        Self {
            classes: vec![ICON_BASE_CLASS.to_string()],
        }
    }

    /// Builds the class set from a `class` attribute value. Duplicate tokens
    /// are collapsed, and if the markup lists several variants only the last
    /// one is kept.
    pub fn from_class_attr(raw: &str) -> Self {
        let mut icon = Self {
            classes: Vec::new(),
        };
        for token in raw.split_whitespace() {
            if let Some(variant) = IconVariant::from_class_name(token) {
                icon.remove_variants();
                icon.push_unique(variant.class_name());
            } else {
                icon.push_unique(token);
            }
        }
        icon
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn variant(&self) -> Option<IconVariant> {
        self.classes
            .iter()
            .find_map(|class| IconVariant::from_class_name(class))
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    /// Replaces whatever variant is present with `variant` and makes sure the
    /// base class is set.
    pub fn set_variant(&mut self, variant: IconVariant) {
        self.remove_variants();
        self.push_unique(ICON_BASE_CLASS);
        self.push_unique(variant.class_name());
    }

    fn remove_variants(&mut self) {
        self.classes
            .retain(|class| IconVariant::from_class_name(class).is_none());
    }

    fn push_unique(&mut self, class: &str) {
        if !self.contains(class) {
            self.classes.push(class.to_string());
        }
    }
}

impl Default for IconElement {
    fn default() -> Self {
        Self::new()
    }
}
