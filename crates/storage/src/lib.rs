use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, error};

use shared::domain::{
    ElectricityShares, EnergySource, InstalledCapacity, RenewableShareRecord, SourceTotal,
    YearValue,
};

pub const RENEWABLE_SHARES_FILE: &str = "data.csv";
pub const PAGE_TABLE_FILE: &str = "data_pagina.csv";
pub const SHARE_RENEWABLES_FILE: &str = "04 share-electricity-renewables.csv";
pub const SHARE_WIND_FILE: &str = "11 share-electricity-wind.csv";
pub const SHARE_SOLAR_FILE: &str = "15 share-electricity-solar.csv";
pub const SHARE_HYDRO_FILE: &str = "07 share-electricity-hydro.csv";
pub const WIND_CAPACITY_FILE: &str = "09 cumulative-installed-wind-energy-capacity-gigawatts.csv";
pub const SOLAR_CAPACITY_FILE: &str = "13 installed-solar-PV-capacity.csv";
pub const MODERN_CONSUMPTION_FILE: &str = "02 modern-renewable-energy-consumption.csv";

const WORLD_ENTITY: &str = "World";
const MODERN_CONSUMPTION_COLUMNS: [&str; 4] = [
    "Geo Biomass Other - TWh",
    "Solar Generation - TWh",
    "Wind Generation - TWh",
    "Hydro Generation - TWh",
];

/// Read-only access to the CSV datasets under a single data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: PathBuf,
}

/// Figures loaded once at startup and shared by every request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetSnapshot {
    pub renewables: Vec<RenewableShareRecord>,
    pub source_totals: Vec<SourceTotal>,
}

impl DatasetSnapshot {
    pub fn total_renewables(&self) -> f64 {
        self.renewables.iter().map(|record| record.renewables).sum()
    }
}

struct Table {
    file_name: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| anyhow!("column '{name}' missing from '{}'", self.file_name))
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }
}

impl DataStore {
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let metadata = tokio::fs::metadata(&data_dir)
            .await
            .with_context(|| format!("data directory '{}' is not readable", data_dir.display()))?;
        if !metadata.is_dir() {
            bail!("data path '{}' is not a directory", data_dir.display());
        }
        Ok(Self { data_dir })
    }

    pub async fn health_check(&self) -> Result<()> {
        tokio::fs::read_dir(&self.data_dir)
            .await
            .with_context(|| format!("cannot list '{}'", self.data_dir.display()))?;
        Ok(())
    }

    /// Loads the startup figures. The renewable share list degrades to empty
    /// when its file is unreadable.
    pub async fn load_snapshot(&self) -> Result<DatasetSnapshot> {
        let renewables = match self.load_renewable_shares().await {
            Ok(records) => records,
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to read renewable share dataset");
                Vec::new()
            }
        };
        let source_totals = self.source_totals().await?;
        Ok(DatasetSnapshot {
            renewables,
            source_totals,
        })
    }

    pub async fn load_renewable_shares(&self) -> Result<Vec<RenewableShareRecord>> {
        let table = self.read_table(RENEWABLE_SHARES_FILE).await?;
        let entity = table.column("Entity")?;
        let code = table.column("Code")?;
        let year = table.column("Year")?;
        let renewables = table.column("Renewables (% equivalent primary energy)")?;

        table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| -> Result<RenewableShareRecord> {
                let line = index + 2;
                Ok(RenewableShareRecord {
                    entity: cell(row, entity).to_string(),
                    code: cell(row, code).to_string(),
                    year: parse_year(cell(row, year))
                        .ok_or_else(|| anyhow!("invalid Year on line {line}"))?,
                    renewables: parse_number(cell(row, renewables))
                        .ok_or_else(|| anyhow!("invalid renewables value on line {line}"))?,
                })
            })
            .collect()
    }

    /// Sums every source's value column. Sources without a dataset file are
    /// skipped; unparseable cells count as zero.
    pub async fn source_totals(&self) -> Result<Vec<SourceTotal>> {
        let mut totals = Vec::new();
        for source in EnergySource::ALL {
            if !self.exists(source.file_name()).await {
                debug!(source = source.label(), "dataset missing, skipping source total");
                continue;
            }
            let table = self.read_table(source.file_name()).await?;
            let column = table.column(source.value_column())?;
            let total_twh = table
                .rows
                .iter()
                .map(|row| parse_number(cell(row, column)).unwrap_or(0.0))
                .sum();
            totals.push(SourceTotal { source, total_twh });
        }
        Ok(totals)
    }

    /// Wind, solar and hydro share of electricity for the most recent year of
    /// the overall renewables dataset. A missing row or column yields zero.
    pub async fn electricity_shares(&self) -> Result<ElectricityShares> {
        let renewables = self.read_table(SHARE_RENEWABLES_FILE).await?;
        let year_column = renewables.column("Year")?;
        let year = renewables
            .rows
            .iter()
            .filter_map(|row| parse_year(cell(row, year_column)))
            .max();

        let Some(year) = year else {
            return Ok(ElectricityShares::default());
        };

        Ok(ElectricityShares {
            year: Some(year),
            wind: self
                .first_value_for_year(SHARE_WIND_FILE, "Wind (% electricity)", year)
                .await?,
            solar: self
                .first_value_for_year(SHARE_SOLAR_FILE, "Solar (% electricity)", year)
                .await?,
            hydro: self
                .first_value_for_year(SHARE_HYDRO_FILE, "Hydro (% electricity)", year)
                .await?,
        })
    }

    pub async fn installed_capacity(&self) -> Result<InstalledCapacity> {
        Ok(InstalledCapacity {
            wind: self
                .year_series(WIND_CAPACITY_FILE, "Wind Capacity")
                .await?,
            solar: self
                .year_series(SOLAR_CAPACITY_FILE, "Solar Capacity")
                .await?,
        })
    }

    /// Yearly world total of modern renewable consumption in TWh.
    pub async fn world_consumption(&self) -> Result<Vec<YearValue>> {
        let table = self.read_table(MODERN_CONSUMPTION_FILE).await?;
        let entity = table.column("Entity")?;
        let year = table.column("Year")?;
        let columns = MODERN_CONSUMPTION_COLUMNS
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(table
            .rows
            .iter()
            .filter(|row| cell(row, entity) == WORLD_ENTITY)
            .filter_map(|row| {
                let year = parse_year(cell(row, year))?;
                let value = columns
                    .iter()
                    .map(|&column| parse_number(cell(row, column)).unwrap_or(0.0))
                    .sum();
                Some(YearValue { year, value })
            })
            .collect())
    }

    /// Rows of the page table without its header row.
    pub async fn page_table(&self) -> Result<Vec<Vec<String>>> {
        let table = self.read_table(PAGE_TABLE_FILE).await?;
        Ok(table
            .rows
            .iter()
            .map(|row| row.iter().map(str::to_string).collect())
            .collect())
    }

    async fn first_value_for_year(&self, file_name: &str, column: &str, year: i32) -> Result<f64> {
        let table = self.read_table(file_name).await?;
        let year_column = table.column("Year")?;
        let Some(value_column) = table.optional_column(column) else {
            return Ok(0.0);
        };
        Ok(table
            .rows
            .iter()
            .find(|row| parse_year(cell(row, year_column)) == Some(year))
            .and_then(|row| parse_number(cell(row, value_column)))
            .unwrap_or(0.0))
    }

    async fn year_series(&self, file_name: &str, column: &str) -> Result<Vec<YearValue>> {
        let table = self.read_table(file_name).await?;
        let year_column = table.column("Year")?;
        let value_column = table.column(column)?;
        Ok(table
            .rows
            .iter()
            .filter_map(|row| {
                Some(YearValue {
                    year: parse_year(cell(row, year_column))?,
                    value: parse_number(cell(row, value_column))?,
                })
            })
            .collect())
    }

    async fn exists(&self, file_name: &str) -> bool {
        tokio::fs::try_exists(self.data_dir.join(file_name))
            .await
            .unwrap_or(false)
    }

    async fn read_table(&self, file_name: &str) -> Result<Table> {
        let path = self.data_dir.join(file_name);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read dataset '{}'", path.display()))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of '{file_name}'"))?
            .clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("malformed csv in '{file_name}'"))?;

        Ok(Table {
            file_name: file_name.to_string(),
            headers,
            rows,
        })
    }
}

fn cell(row: &StringRecord, column: usize) -> &str {
    row.get(column).map(str::trim).unwrap_or_default()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value = parse_number(raw)?;
    (value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX)).then_some(value as i32)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
