//! Six small source tables
//!
//! `A Sharma` and `B Khan` appear in every table. Each format also has one
//! player of its own, in both its batting and bowling table: `C Onedayer`
//! (ODI), `D Slogger` (T20) and `E Stayer` (Test). A Sharma has two ODI
//! batting rows (10 and 15 runs, top scores 99 and 150*), 30 batting innings
//! against 20 bowling innings, and retired in 2020. B Khan's Test bowling
//! average is `-`.

use std::path::PathBuf;

use cricstats::config::SourceSpec;
use cricstats::io::read_csv_from_reader;
use cricstats::{DataFrame, MemorySource, PipelineConfig};

use super::TempTestDir;

pub const BATTING_ODI: &str = "\
Player,Mat,Inns,NO,Runs,HS,Ave,BF,SR,100,50,0
A Sharma,12,5,1,10,99,2.5,20,50.0,0,0,1
A Sharma,12,5,0,15,150*,3.0,30,50.0,0,0,0
B Khan,40,20,2,800,120,44.44,900,88.8,2,5,1
C Onedayer,3,3,0,40,20,13.33,50,80.0,0,0,0
";

pub const BATTING_T20: &str = "\
Player,Mat,Inns,NO,Runs,HS,Ave,BF,SR,100,50,0
A Sharma,10,10,2,200,45,25.0,160,125.0,0,1,0
B Khan,25,20,1,600,90,31.57,450,133.33,0,4,1
D Slogger,8,8,0,150,60,18.75,100,150.0,0,1,1
";

pub const BATTING_TEST: &str = "\
Player,Span,Mat,Inns,NO,Runs,HS,Ave,BF,SR,100,50,0
A Sharma,2005-2020,6,10,1,300,88,33.33,700,42.85,0,2,1
B Khan,2010-2024,11,20,0,1000,150,50.0,2000,50.0,3,4,0
E Stayer,1990-2001,40,70,5,2500,201,38.46,6000,41.6,6,12,4
";

pub const BOWLING_ODI: &str = "\
Player,Mat,Inns,Balls,Runs,Wkts,BBI,Ave,Econ,SR,4,5
A Sharma,12,5,240,200,8,3/20,25.0,5.0,30.0,0,0
B Khan,40,2,60,70,1,1/30,70.0,7.0,60.0,0,0
C Onedayer,3,2,60,55,2,2/25,27.5,5.5,30.0,0,0
";

pub const BOWLING_T20: &str = "\
Player,Mat,Inns,Balls,Runs,Wkts,BBI,Ave,Econ,SR,4,5
A Sharma,10,5,96,130,6,2/18,21.66,8.12,16.0,0,0
B Khan,25,2,24,40,0,-,-,10.0,-,0,0
D Slogger,8,4,84,110,5,3/21,22.0,7.85,16.8,0,0
";

pub const BOWLING_TEST: &str = "\
Player,Span,Mat,Inns,Balls,Runs,Wkts,BBI,Ave,Econ,SR,4,5
A Sharma,2005-2020,6,10,1200,600,15,5/40,40.0,3.0,80.0,1,1
B Khan,2010-2024,11,2,120,90,0,-,-,4.5,-,0,0
E Stayer,1990-2001,40,30,1800,900,20,4/33,45.0,3.0,90.0,1,0
";

pub const METADATA: &str = "\
Name,Country,Born
A Sharma,India,1985
Z Unknown,Kenya,1990
A Sharma,Nepal,1986
B Khan,Pakistan,1988
";

/// Every source identifier with its CSV text, in the default load order
pub fn fixture_tables() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Bowling_ODI", BOWLING_ODI),
        ("Batting_ODI", BATTING_ODI),
        ("Bowling_T20", BOWLING_T20),
        ("Batting_T20", BATTING_T20),
        ("Bowling_Test", BOWLING_TEST),
        ("Batting_Test", BATTING_TEST),
    ]
}

/// Parse CSV text into a DataFrame
pub fn fixture_frame(csv: &str) -> DataFrame {
    read_csv_from_reader(csv.as_bytes()).unwrap()
}

/// The six fixture tables served from memory
pub fn fixture_source() -> MemorySource {
    fixture_tables()
        .into_iter()
        .fold(MemorySource::new(), |source, (id, csv)| {
            source.with(id, fixture_frame(csv))
        })
}

/// Default config with a fixed current year
pub fn fixture_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.span.current_year = 2024;
    config
}

/// Write the six fixture tables into `dir` and point a config at them
pub fn write_fixture_sources(dir: &TempTestDir) -> PipelineConfig {
    let mut config = fixture_config();
    config.sources = fixture_tables()
        .into_iter()
        .map(|(id, csv)| SourceSpec {
            id: id.to_string(),
            path: dir.write_file(&format!("{}.csv", id), csv).unwrap(),
        })
        .collect();
    config.output = dir.path().join("out").join("combined.csv");
    config
}

/// Players who appear in a single format only
pub const FORMAT_EXCLUSIVE_PLAYERS: [&str; 3] = ["C Onedayer", "D Slogger", "E Stayer"];

/// Path helper for files that do not exist yet
pub fn missing_path(dir: &TempTestDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
