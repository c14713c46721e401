use shared::domain::{IconSelector, IconSelectorError, IconVariant};
use tracing::{debug, warn};

use crate::{carousel::Carousel, icon::IconElement};

/// Browser signals that trigger an icon refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Loaded,
    SlideTransitioned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated(IconVariant),
    NoActiveSlide,
    MissingSelector,
    InvalidSelector(IconSelectorError),
}

impl SyncOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, SyncOutcome::Updated(_))
    }
}

/// Keeps the energy icon's variant in step with the carousel's active slide.
///
/// Only [`SyncOutcome::Updated`] touches the icon; every other outcome
/// leaves the previous class set as it was.
#[derive(Debug, Clone, Default)]
pub struct IconSynchronizer {
    icon: IconElement,
}

impl IconSynchronizer {
    pub fn new(icon: IconElement) -> Self {
        Self { icon }
    }

    pub fn icon(&self) -> &IconElement {
        &self.icon
    }

    pub fn update_icon(&mut self, carousel: &impl Carousel) -> SyncOutcome {
        let Some(slide) = carousel.active_slide() else {
            return SyncOutcome::NoActiveSlide;
        };
        let Some(raw) = slide.icon_selector else {
            return SyncOutcome::MissingSelector;
        };

        match raw.parse::<IconSelector>() {
            Ok(selector) => {
                self.icon.set_variant(selector.variant);
                SyncOutcome::Updated(selector.variant)
            }
            Err(err) => {
                warn!(selector = %raw, error = %err, "ignoring slide icon selector");
                SyncOutcome::InvalidSelector(err)
            }
        }
    }

    pub fn handle_event(&mut self, event: PageEvent, carousel: &impl Carousel) -> SyncOutcome {
        let outcome = self.update_icon(carousel);
        debug!(?event, ?outcome, icon = %self.icon.class_attr(), "icon synchronized");
        outcome
    }
}
