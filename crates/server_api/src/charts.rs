//! Chart specifications built from dataset figures.

use shared::{
    domain::{ElectricityShares, InstalledCapacity, SourceTotal, YearValue},
    protocol::{ChartKind, ChartPoint, ChartSeries, ChartSpec},
};

const BAR_COLORS: [&str; 5] = ["blue", "orange", "green", "red", "purple"];
const PIE_COLORS: [&str; 3] = ["skyblue", "gold", "lightgreen"];
/// Flat conventional consumption used as the comparison baseline, in TWh.
pub const CONVENTIONAL_BASELINE_TWH: f64 = 1000.0;

pub fn production_by_source(totals: &[SourceTotal]) -> ChartSpec {
    let points = totals
        .iter()
        .zip(BAR_COLORS)
        .enumerate()
        .map(|(index, (total, color))| ChartPoint {
            label: total.source.label().to_string(),
            x: index as f64,
            y: total.total_twh,
            color: Some(color.to_string()),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Producción de Energía Renovable por Fuente".into(),
        x_label: Some("Fuente de Energía".into()),
        y_label: Some("Producción (TWh)".into()),
        series: vec![ChartSeries {
            label: "Producción (TWh)".into(),
            color: None,
            fill_opacity: None,
            points,
        }],
    }
}

pub fn electricity_share(shares: &ElectricityShares) -> ChartSpec {
    let slices = [
        ("Eólica", shares.wind),
        ("Solar", shares.solar),
        ("Hidroeléctrica", shares.hydro),
    ];
    let points = slices
        .into_iter()
        .zip(PIE_COLORS)
        .enumerate()
        .map(|(index, ((label, value), color))| ChartPoint {
            label: label.to_string(),
            x: index as f64,
            y: value,
            color: Some(color.to_string()),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Pie,
        title: "Participación de Energías Renovables".into(),
        x_label: None,
        y_label: None,
        series: vec![ChartSeries {
            label: "Participacion".into(),
            color: None,
            fill_opacity: None,
            points,
        }],
    }
}

pub fn installed_capacity_trend(capacity: &InstalledCapacity) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Tendencias en la Capacidad Instalada (Eólica vs Solar)".into(),
        x_label: Some("Año".into()),
        y_label: Some("Capacidad Instalada (Gigawatts)".into()),
        series: vec![
            year_series("Capacidad Eólica", "blue", None, &capacity.wind),
            year_series("Capacidad Solar", "orange", None, &capacity.solar),
        ],
    }
}

pub fn renewable_vs_conventional(world: &[YearValue]) -> ChartSpec {
    let baseline: Vec<YearValue> = world
        .iter()
        .map(|point| YearValue {
            year: point.year,
            value: CONVENTIONAL_BASELINE_TWH,
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Area,
        title: "Comparación entre Consumo de Energía Renovable y Convencional".into(),
        x_label: Some("Año".into()),
        y_label: Some("Consumo de Energía (TWh)".into()),
        series: vec![
            year_series("Energía Renovable", "green", Some(0.5), world),
            year_series("Energía Convencional", "red", Some(0.5), &baseline),
        ],
    }
}

fn year_series(label: &str, color: &str, fill_opacity: Option<f64>, values: &[YearValue]) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        color: Some(color.to_string()),
        fill_opacity,
        points: values
            .iter()
            .map(|point| ChartPoint {
                label: point.year.to_string(),
                x: f64::from(point.year),
                y: point.value,
                color: None,
            })
            .collect(),
    }
}
