use shared::domain::SlideSpec;

/// What the synchronizer needs to know about a slide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slide {
    /// Raw `data-icon` attribute, if the slide declares one.
    pub icon_selector: Option<String>,
}

impl Slide {
    pub fn with_icon(selector: impl Into<String>) -> Self {
        Self {
            icon_selector: Some(selector.into()),
        }
    }

    pub fn without_icon() -> Self {
        Self::default()
    }
}

pub trait Carousel {
    /// The currently active slide, or `None` before the carousel marked one.
    fn active_slide(&self) -> Option<Slide>;
}

/// In-memory carousel with the same wrap-around navigation as the widget.
#[derive(Debug, Clone, Default)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    active: Option<usize>,
}

impl SlideDeck {
    /// A deck with no active slide.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            active: None,
        }
    }

    /// A deck built from page slides, with the first one active.
    pub fn from_specs(specs: &[SlideSpec]) -> Self {
        let slides = specs
            .iter()
            .map(|spec| Slide::with_icon(spec.icon.to_string()))
            .collect::<Vec<_>>();
        let active = (!slides.is_empty()).then_some(0);
        Self { slides, active }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn next(&mut self) -> Option<usize> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.step(self.slides.len().saturating_sub(1))
    }

    fn step(&mut self, offset: usize) -> Option<usize> {
        if self.slides.is_empty() {
            return None;
        }
        let next = self
            .active
            .map_or(0, |current| (current + offset) % self.slides.len());
        self.active = Some(next);
        self.active
    }
}

impl Carousel for SlideDeck {
    fn active_slide(&self) -> Option<Slide> {
        self.active.and_then(|index| self.slides.get(index).cloned())
    }
}
