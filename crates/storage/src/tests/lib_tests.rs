use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).expect("write fixture");
}

async fn store_with(files: &[(&str, &str)]) -> (TempDir, DataStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        write(&dir, name, contents);
    }
    let store = DataStore::open(dir.path()).await.expect("open store");
    (dir, store)
}

#[tokio::test]
async fn open_rejects_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(DataStore::open(&missing).await.is_err());
}

#[tokio::test]
async fn loads_renewable_share_records() {
    let (_dir, store) = store_with(&[(
        RENEWABLE_SHARES_FILE,
        "Entity,Code,Year,Renewables (% equivalent primary energy)\n\
         Colombia,COL,2020,30.5\n\
         World,OWID_WRL,2021,12.25\n",
    )])
    .await;

    let records = store.load_renewable_shares().await.expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entity, "Colombia");
    assert_eq!(records[0].code, "COL");
    assert_eq!(records[1].year, 2021);
    assert!((records[1].renewables - 12.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn snapshot_degrades_to_empty_renewables_when_file_missing() {
    let (_dir, store) = store_with(&[]).await;
    let snapshot = store.load_snapshot().await.expect("snapshot");
    assert!(snapshot.renewables.is_empty());
    assert!(snapshot.source_totals.is_empty());
    assert_eq!(snapshot.total_renewables(), 0.0);
}

#[tokio::test]
async fn source_totals_skip_missing_files_and_zero_bad_cells() {
    let (_dir, store) = store_with(&[
        (
            "08 wind-generation.csv",
            "Entity,Year,Electricity from wind (TWh)\nA,2000,10\nB,2001,n/a\nC,2002,5.5\n",
        ),
        (
            "12 solar-energy-consumption.csv",
            "Entity,Year,Electricity from solar (TWh)\nA,2000,\nB,2001,2\n",
        ),
    ])
    .await;

    let totals = store.source_totals().await.expect("totals");
    assert_eq!(
        totals,
        vec![
            SourceTotal {
                source: EnergySource::Wind,
                total_twh: 15.5
            },
            SourceTotal {
                source: EnergySource::Solar,
                total_twh: 2.0
            },
        ]
    );
}

#[tokio::test]
async fn source_totals_fail_when_value_column_is_absent() {
    let (_dir, store) = store_with(&[("08 wind-generation.csv", "Entity,Year,Other\nA,2000,1\n")]).await;
    let err = store.source_totals().await.expect_err("should fail");
    assert!(err.to_string().contains("Electricity from wind (TWh)"));
}

#[tokio::test]
async fn electricity_shares_use_latest_renewables_year() {
    let (_dir, store) = store_with(&[
        (
            SHARE_RENEWABLES_FILE,
            "Entity,Year,Renewables (% electricity)\nWorld,2019,26\nWorld,2021,28\n",
        ),
        (
            SHARE_WIND_FILE,
            "Entity,Year,Wind (% electricity)\nWorld,2019,5\nWorld,2021,6.5\n",
        ),
        (
            SHARE_SOLAR_FILE,
            "Entity,Year,Solar (% electricity)\nWorld,2021,3.6\nOther,2021,9\n",
        ),
        (SHARE_HYDRO_FILE, "Entity,Year,Hydro (% electricity)\nWorld,2019,16\n"),
    ])
    .await;

    let shares = store.electricity_shares().await.expect("shares");
    assert_eq!(shares.year, Some(2021));
    assert_eq!(shares.wind, 6.5);
    assert_eq!(shares.solar, 3.6);
    assert_eq!(shares.hydro, 0.0);
}

#[tokio::test]
async fn installed_capacity_drops_incomplete_rows() {
    let (_dir, store) = store_with(&[
        (
            WIND_CAPACITY_FILE,
            "Entity,Year,Wind Capacity\nWorld,2000,17\nWorld,2001,\nWorld,2002,31.1\n",
        ),
        (SOLAR_CAPACITY_FILE, "Entity,Year,Solar Capacity\nWorld,,4\nWorld,2002,2.2\n"),
    ])
    .await;

    let capacity = store.installed_capacity().await.expect("capacity");
    assert_eq!(
        capacity.wind,
        vec![
            YearValue {
                year: 2000,
                value: 17.0
            },
            YearValue {
                year: 2002,
                value: 31.1
            },
        ]
    );
    assert_eq!(
        capacity.solar,
        vec![YearValue {
            year: 2002,
            value: 2.2
        }]
    );
}

#[tokio::test]
async fn world_consumption_sums_generation_columns() {
    let (_dir, store) = store_with(&[(
        MODERN_CONSUMPTION_FILE,
        "Entity,Code,Year,Geo Biomass Other - TWh,Solar Generation - TWh,Wind Generation - TWh,Hydro Generation - TWh\n\
         World,OWID_WRL,2020,1,2,3,4\n\
         Europe,,2020,100,100,100,100\n\
         World,OWID_WRL,2021,1.5,,3,4\n",
    )])
    .await;

    let series = store.world_consumption().await.expect("series");
    assert_eq!(
        series,
        vec![
            YearValue {
                year: 2020,
                value: 10.0
            },
            YearValue {
                year: 2021,
                value: 8.5
            },
        ]
    );
}

#[tokio::test]
async fn page_table_skips_header_and_keeps_ragged_rows() {
    let (_dir, store) = store_with(&[(
        PAGE_TABLE_FILE,
        "Fuente,Ventaja\nSolar,Abundante\nEólica,Limpia,extra\n",
    )])
    .await;

    let rows = store.page_table().await.expect("rows");
    assert_eq!(
        rows,
        vec![
            vec!["Solar".to_string(), "Abundante".to_string()],
            vec!["Eólica".to_string(), "Limpia".to_string(), "extra".to_string()],
        ]
    );
}

#[test]
fn year_parser_accepts_float_formatted_years() {
    assert_eq!(parse_year("2020"), Some(2020));
    assert_eq!(parse_year("2020.0"), Some(2020));
    assert_eq!(parse_year("2020.5"), None);
    assert_eq!(parse_year(""), None);
}
