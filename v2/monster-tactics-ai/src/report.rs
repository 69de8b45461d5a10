//! Match report files: pretty-printed JSON of a [`MatchReport`].

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use monster_tactics_core::MatchReport;

use crate::error::AiResult;

/// Write `report` to `path`, creating parent directories as needed.
pub fn save(path: &Path, report: &MatchReport) -> AiResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn load(path: &Path) -> AiResult<MatchReport> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use std::sync::Arc;

    use monster_tactics_core::{Board, Catalog, Team};

    #[test]
    fn test_report_file_roundtrip() {
        let path = std::env::temp_dir().join("monster_tactics_report_test").join("report.json");

        let mut board = Board::new(Arc::new(Catalog::standard()), 2);
        board.spawn("StarterKing", Team::Player, "E1".parse().unwrap()).unwrap();
        board.begin_turn(Team::Player);
        let report = MatchReport::from_board(&board, "Player Wins!");

        save(&path, &report).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, report);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("monster_tactics_no_such_report.json");
        assert!(matches!(load(&path), Err(AiError::Io(_))));
    }
}
