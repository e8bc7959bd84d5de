use super::SqliteSheetHost;
use crate::domain::CellValue;
use crate::repository::error::RepositoryError;
use crate::repository::sheet_host::{SheetHost, MAX_GRID_ROWS};
use chrono::{TimeZone, Utc};

fn setup_host() -> SqliteSheetHost {
    SqliteSheetHost::open_in_memory().unwrap()
}

fn text_row(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

#[test]
fn test_insert_and_find_sheet() {
    let host = setup_host();

    assert!(host.find_sheet("members").unwrap().is_none());

    let info = host.insert_sheet("members", None).unwrap();
    assert_eq!(info.name, "members");
    assert_eq!(info.position, 0);

    let found = host.find_sheet("members").unwrap().unwrap();
    assert_eq!(found.sheet_id, info.sheet_id);
}

#[test]
fn test_insert_sheet_指定位置() {
    let host = setup_host();
    host.insert_sheet("a", None).unwrap();
    host.insert_sheet("b", None).unwrap();
    host.insert_sheet("first", Some(0)).unwrap();

    let names: Vec<String> = host.list_sheets().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["first", "a", "b"]);
}

#[test]
fn test_insert_sheet_重复与空名称() {
    let host = setup_host();
    host.insert_sheet("members", None).unwrap();

    assert!(matches!(
        host.insert_sheet("members", None),
        Err(RepositoryError::DuplicateSheet(_))
    ));
    assert!(matches!(
        host.insert_sheet("  ", None),
        Err(RepositoryError::InvalidSheetName(_))
    ));
}

#[test]
fn test_set_and_get_values() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();

    host.set_values("s", 1, 1, &[text_row(&["name", "email"])]).unwrap();
    host.set_values("s", 2, 2, &[vec![CellValue::Number(1.5)]]).unwrap();

    let values = host.get_values("s", 1, 1, 2, 3).unwrap();
    assert_eq!(values[0], vec![CellValue::text("name"), CellValue::text("email"), CellValue::Empty]);
    assert_eq!(values[1], vec![CellValue::Empty, CellValue::Number(1.5), CellValue::Empty]);
}

#[test]
fn test_last_row_and_column() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    assert_eq!(host.last_row("s").unwrap(), 0);
    assert_eq!(host.last_column("s").unwrap(), 0);

    host.set_values("s", 1, 1, &[text_row(&["a", "b", "c"])]).unwrap();
    host.append_row("s", &text_row(&["x"])).unwrap();

    assert_eq!(host.last_row("s").unwrap(), 2);
    assert_eq!(host.last_column("s").unwrap(), 3);
}

#[test]
fn test_append_row() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    host.set_values("s", 1, 1, &[text_row(&["h1", "h2"])]).unwrap();

    assert_eq!(host.append_row("s", &text_row(&["a", "b"])).unwrap(), 2);
    assert_eq!(host.append_row("s", &text_row(&["c", "d"])).unwrap(), 3);
    assert!(host.append_row("s", &[]).is_err());
}

#[test]
fn test_delete_row_后续行上移() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    host.set_values("s", 1, 1, &[text_row(&["h"])]).unwrap();
    for v in ["r2", "r3", "r4"] {
        host.append_row("s", &text_row(&[v])).unwrap();
    }

    host.delete_row("s", 3).unwrap();

    assert_eq!(host.last_row("s").unwrap(), 3);
    let values = host.get_values("s", 2, 1, 2, 1).unwrap();
    assert_eq!(values, vec![text_row(&["r2"]), text_row(&["r4"])]);
}

#[test]
fn test_write_empty_清空单元格() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    host.set_values("s", 1, 1, &[text_row(&["a", "b"])]).unwrap();
    host.set_values("s", 1, 2, &[vec![CellValue::Empty]]).unwrap();

    assert_eq!(host.last_column("s").unwrap(), 1);
}

#[test]
fn test_invalid_range() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();

    assert!(matches!(
        host.get_values("s", 0, 1, 1, 1),
        Err(RepositoryError::InvalidRange { .. })
    ));
    assert!(matches!(
        host.set_values("s", 1, 1, &[vec![]]),
        Err(RepositoryError::InvalidRange { .. })
    ));
    assert!(matches!(
        host.delete_row("s", -1),
        Err(RepositoryError::InvalidRange { .. })
    ));
}

#[test]
fn test_超出网格的写入被拒绝() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();

    for row in [MAX_GRID_ROWS as i64 + 1, u32::MAX as i64] {
        assert!(matches!(
            host.set_values("s", row, 1, &[text_row(&["x"])]),
            Err(RepositoryError::InvalidRange { .. })
        ));
    }
    assert_eq!(host.last_row("s").unwrap(), 0);
}

#[test]
fn test_网格末行之后不能追加() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    host.set_values("s", MAX_GRID_ROWS as i64, 1, &[text_row(&["last"])])
        .unwrap();

    assert!(matches!(
        host.append_row("s", &text_row(&["next"])),
        Err(RepositoryError::InvalidRange { .. })
    ));
    assert_eq!(host.last_row("s").unwrap(), MAX_GRID_ROWS);
}

#[test]
fn test_sheet_not_found() {
    let host = setup_host();
    assert!(matches!(host.last_row("missing"), Err(RepositoryError::SheetNotFound(_))));
    assert!(matches!(
        host.set_frozen_rows("missing", 1),
        Err(RepositoryError::SheetNotFound(_))
    ));
}

#[test]
fn test_cell_types_round_trip() {
    let host = setup_host();
    host.insert_sheet("s", None).unwrap();
    let date = Utc.with_ymd_and_hms(2024, 5, 31, 16, 0, 0).unwrap();
    let row = vec![
        CellValue::text("text"),
        CellValue::Number(-12.5),
        CellValue::Bool(true),
        CellValue::Date(date),
    ];
    host.set_values("s", 1, 1, &[row.clone()]).unwrap();

    assert_eq!(host.get_values("s", 1, 1, 1, 4).unwrap(), vec![row]);
}

#[test]
fn test_time_zone() {
    let host = setup_host();
    assert_eq!(host.time_zone().unwrap().local_minus_utc(), 0);

    assert!(host.ensure_time_zone("+09:00").unwrap());
    assert!(!host.ensure_time_zone("+01:00").unwrap());
    assert_eq!(host.time_zone().unwrap().local_minus_utc(), 9 * 3600);

    assert!(matches!(
        host.set_time_zone("Asia/Seoul"),
        Err(RepositoryError::InvalidTimeZone(_))
    ));
}

#[test]
fn test_format_date_按文档时区() {
    let host = setup_host();
    host.set_time_zone("+09:00").unwrap();

    // UTC 15:00 在 +09:00 已是次日
    let date = Utc.with_ymd_and_hms(2024, 5, 31, 15, 0, 0).unwrap();
    assert_eq!(host.format_date(&date, "%Y-%m-%d").unwrap(), "2024-06-01");
}
