use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base class every energy icon carries regardless of variant.
pub const ICON_BASE_CLASS: &str = "fas";

/// Element ids, classes and events shared by the rendered page and the
/// browser client.
pub mod page {
    pub const ENERGY_ICON_ID: &str = "energy-icon";
    pub const ENERGY_CAROUSEL_ID: &str = "energyCarousel";
    pub const SLIDE_CLASS: &str = "carousel-item";
    pub const ACTIVE_SLIDE_CLASS: &str = "active";
    pub const ICON_ATTRIBUTE: &str = "data-icon";
    pub const SLIDE_TRANSITIONED_EVENT: &str = "slid.bs.carousel";
    pub const PAGE_LOADED_EVENT: &str = "load";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconVariant {
    Sun,
    Wind,
    Water,
}

impl IconVariant {
    pub const ALL: [IconVariant; 3] = [IconVariant::Sun, IconVariant::Wind, IconVariant::Water];

    pub fn class_name(self) -> &'static str {
        match self {
            IconVariant::Sun => "fa-sun",
            IconVariant::Wind => "fa-wind",
            IconVariant::Water => "fa-water",
        }
    }

    pub fn from_class_name(class: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.class_name() == class)
    }
}

impl fmt::Display for IconVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconSelectorError {
    #[error("icon selector is empty")]
    Empty,
    #[error("icon selector '{0}' must have exactly two class tokens")]
    TokenCount(String),
    #[error("unknown icon variant class '{0}'")]
    UnknownVariant(String),
}

/// Parsed form of a slide's `data-icon` attribute, e.g. `"fas fa-sun"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSelector {
    pub base: String,
    pub variant: IconVariant,
}

impl IconSelector {
    pub fn new(variant: IconVariant) -> Self {
        Self {
            base: ICON_BASE_CLASS.to_string(),
            variant,
        }
    }
}

impl FromStr for IconSelector {
    type Err = IconSelectorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(IconSelectorError::Empty),
            [base, variant] => {
                let variant = IconVariant::from_class_name(variant)
                    .ok_or_else(|| IconSelectorError::UnknownVariant((*variant).to_string()))?;
                Ok(Self {
                    base: (*base).to_string(),
                    variant,
                })
            }
            _ => Err(IconSelectorError::TokenCount(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for IconSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base, self.variant.class_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    Wind,
    Solar,
    Hydropower,
    Biofuels,
    Geothermal,
}

impl EnergySource {
    pub const ALL: [EnergySource; 5] = [
        EnergySource::Wind,
        EnergySource::Solar,
        EnergySource::Hydropower,
        EnergySource::Biofuels,
        EnergySource::Geothermal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnergySource::Wind => "Wind",
            EnergySource::Solar => "Solar",
            EnergySource::Hydropower => "Hidropower",
            EnergySource::Biofuels => "Biofuels",
            EnergySource::Geothermal => "Geothermal",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            EnergySource::Wind => "08 wind-generation.csv",
            EnergySource::Solar => "12 solar-energy-consumption.csv",
            EnergySource::Hydropower => "05 hydropower-consumption.csv",
            EnergySource::Biofuels => "16 biofuel-production.csv",
            EnergySource::Geothermal => "17 installed-geothermal-capacity.csv",
        }
    }

    pub fn value_column(self) -> &'static str {
        match self {
            EnergySource::Wind => "Electricity from wind (TWh)",
            EnergySource::Solar => "Electricity from solar (TWh)",
            EnergySource::Hydropower => "Electricity from hydro (TWh)",
            EnergySource::Biofuels => "Biofuels Production - TWh - Total",
            EnergySource::Geothermal => "Geothermal Capacity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableShareRecord {
    pub entity: String,
    pub code: String,
    pub year: i32,
    pub renewables: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceTotal {
    pub source: EnergySource,
    pub total_twh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElectricityShares {
    pub year: Option<i32>,
    pub wind: f64,
    pub solar: f64,
    pub hydro: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstalledCapacity {
    pub wind: Vec<YearValue>,
    pub solar: Vec<YearValue>,
}

/// One carousel panel as declared in the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub title: String,
    pub caption: String,
    pub icon: IconSelector,
}

pub fn default_slides() -> Vec<SlideSpec> {
    vec![
        SlideSpec {
            title: "Energía Solar".into(),
            caption: "Electricidad generada a partir de la radiación del sol.".into(),
            icon: IconSelector::new(IconVariant::Sun),
        },
        SlideSpec {
            title: "Energía Eólica".into(),
            caption: "Electricidad generada por la fuerza del viento.".into(),
            icon: IconSelector::new(IconVariant::Wind),
        },
        SlideSpec {
            title: "Energía Hidroeléctrica".into(),
            caption: "Electricidad generada por el movimiento del agua.".into(),
            icon: IconSelector::new(IconVariant::Water),
        },
    ]
}

/// Configuration handed to the Typed.js title animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleAnimation {
    pub library_url: String,
    pub target_selector: String,
    pub strings: Vec<String>,
    pub cursor_char: String,
    pub start_delay_ms: u32,
    pub type_speed_ms: u32,
    pub back_speed_ms: u32,
    pub smart_backspace: bool,
    #[serde(rename = "loop")]
    pub loop_forever: bool,
}

impl Default for TitleAnimation {
    fn default() -> Self {
        Self {
            library_url: "https://unpkg.com/typed.js@2.1.0/dist/typed.umd.js".into(),
            target_selector: ".auto-type".into(),
            strings: vec![
                "Energía Renovable".into(),
                "100% Limpia".into(),
                "La Energía del Futuro".into(),
            ],
            cursor_char: "|".into(),
            start_delay_ms: 500,
            type_speed_ms: 50,
            back_speed_ms: 30,
            smart_backspace: true,
            loop_forever: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_token_selector() {
        let selector: IconSelector = "fas fa-sun".parse().expect("selector");
        assert_eq!(selector.base, "fas");
        assert_eq!(selector.variant, IconVariant::Sun);
        assert_eq!(selector.to_string(), "fas fa-sun");
    }

    #[test]
    fn tolerates_extra_whitespace_between_tokens() {
        let selector: IconSelector = "  fas   fa-water ".parse().expect("selector");
        assert_eq!(selector.variant, IconVariant::Water);
    }

    #[test]
    fn rejects_single_token_selector() {
        let err = "fa-sun".parse::<IconSelector>().expect_err("should fail");
        assert_eq!(err, IconSelectorError::TokenCount("fa-sun".into()));
    }

    #[test]
    fn rejects_unknown_variant() {
        let err = "fas fa-fire".parse::<IconSelector>().expect_err("should fail");
        assert_eq!(err, IconSelectorError::UnknownVariant("fa-fire".into()));
    }

    #[test]
    fn rejects_blank_selector() {
        assert_eq!(
            "   ".parse::<IconSelector>().expect_err("should fail"),
            IconSelectorError::Empty
        );
    }

    #[test]
    fn title_animation_serializes_loop_flag_under_library_name() {
        let json = serde_json::to_value(TitleAnimation::default()).expect("json");
        assert_eq!(json["loop"], true);
        assert_eq!(json["strings"][1], "100% Limpia");
    }
}
