// ==========================================
// ConfigRegistry 集成测试
// ==========================================
// 目标: 注册表初始化、注册校验、查重、默认值
// ==========================================

mod helpers;
mod test_helpers;

use helpers::api_test_helper::*;
use serde_json::json;
use sheet_admin::api::ApiError;
use sheet_admin::domain::{
    CellValue, ColumnSpec, CONFIG_HEADERS, CONFIG_SHEET_NAME, DEFAULT_EXPOSURE, DEFAULT_ORDER,
};
use test_helpers::read_row;

#[test]
fn test_启动时创建注册表() {
    let env = ApiTestEnv::new().unwrap();

    let info = env.host().find_sheet(CONFIG_SHEET_NAME).unwrap().unwrap();
    assert_eq!(info.position, 0);
    assert_eq!(info.frozen_rows, 1);

    let header = read_row(env.host().as_ref(), CONFIG_SHEET_NAME, 1, 5);
    let expected: Vec<CellValue> = CONFIG_HEADERS.iter().map(|h| CellValue::from(*h)).collect();
    assert_eq!(header, expected);

    assert!(env.registry().list().unwrap().is_empty());
}

#[test]
fn test_注册后可查询() {
    let env = ApiTestEnv::new().unwrap();

    let mut config = new_sheet_config("members", json!(["이름", "이메일", "가입일"]));
    config.title = "회원 목록".to_string();
    config.order = Some(json!(2));
    config.exposure = Some(json!("N"));
    env.registry().register(&config).unwrap();

    let configs = env.registry().list().unwrap();
    assert_eq!(configs.len(), 1);
    let stored = &configs[0];
    assert_eq!(stored.sheet_name, "members");
    assert_eq!(stored.title, "회원 목록");
    assert_eq!(stored.headers_str, "이름, 이메일, 가입일");
    assert_eq!(stored.order, 2);
    assert_eq!(stored.exposure, "N");
    assert!(!stored.is_exposed());

    // 新工作表: 表头行写入并冻结
    let sheet = env.host().find_sheet("members").unwrap().unwrap();
    assert_eq!(sheet.frozen_rows, 1);
    assert_eq!(
        read_row(env.host().as_ref(), "members", 1, 3),
        vec![
            CellValue::text("이름"),
            CellValue::text("이메일"),
            CellValue::text("가입일")
        ]
    );
}

#[test]
fn test_注册默认排序与显示标志() {
    let env = ApiTestEnv::new().unwrap();

    let mut config = new_sheet_config("notices", json!(["제목"]));
    config.order = Some(json!(0));
    config.exposure = Some(json!(""));
    env.registry().register(&config).unwrap();

    let stored = env.registry().find("notices").unwrap().unwrap();
    assert_eq!(stored.order, DEFAULT_ORDER);
    assert_eq!(stored.exposure, DEFAULT_EXPOSURE);
    assert!(stored.is_exposed());
}

#[test]
fn test_注册表中的非数字排序读为9999() {
    let env = ApiTestEnv::new().unwrap();
    env.register_sheet("members", &["이름"]);

    // 手工修改注册表中的排序列
    env.host()
        .set_values(CONFIG_SHEET_NAME, 2, 4, &[vec![CellValue::text("abc")]])
        .unwrap();
    assert_eq!(env.registry().find("members").unwrap().unwrap().order, DEFAULT_ORDER);

    env.host()
        .set_values(CONFIG_SHEET_NAME, 2, 4, &[vec![CellValue::text("12번")]])
        .unwrap();
    assert_eq!(env.registry().find("members").unwrap().unwrap().order, 12);
}

#[test]
fn test_表头无效时拒绝注册() {
    let env = ApiTestEnv::new().unwrap();

    for headers in [json!([]), json!("이름"), json!(null), json!(["이름", 3])] {
        let result = env.registry().register(&new_sheet_config("members", headers));
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    // 校验失败时不创建任何工作表
    assert!(env.host().find_sheet("members").unwrap().is_none());
    assert!(env.registry().list().unwrap().is_empty());
}

#[test]
fn test_重复名称拒绝注册() {
    let env = ApiTestEnv::new().unwrap();
    env.register_sheet("members", &["이름"]);

    let result = env
        .registry()
        .register(&new_sheet_config("members", json!(["다른 헤더"])));
    assert!(matches!(result, Err(ApiError::Duplicate(name)) if name == "members"));

    // 注册表与原表头保持不变
    assert_eq!(env.registry().list().unwrap().len(), 1);
    assert_eq!(
        read_row(env.host().as_ref(), "members", 1, 1),
        vec![CellValue::text("이름")]
    );
}

#[test]
fn test_已存在的同名工作表被复用() {
    let env = ApiTestEnv::new().unwrap();
    env.host().insert_sheet("legacy", None).unwrap();
    env.host()
        .set_values("legacy", 2, 1, &[vec![CellValue::text("기존 데이터")]])
        .unwrap();

    env.register_sheet("legacy", &["항목"]);

    assert_eq!(
        read_row(env.host().as_ref(), "legacy", 1, 1),
        vec![CellValue::text("항목")]
    );
    assert_eq!(
        read_row(env.host().as_ref(), "legacy", 2, 1),
        vec![CellValue::text("기존 데이터")]
    );
}

#[test]
fn test_按注册顺序列出() {
    let env = ApiTestEnv::new().unwrap();
    env.register_sheet("b_sheet", &["x"]);
    env.register_sheet("a_sheet", &["y"]);

    let names: Vec<String> = env
        .registry()
        .list()
        .unwrap()
        .into_iter()
        .map(|c| c.sheet_name)
        .collect();
    assert_eq!(names, vec!["b_sheet", "a_sheet"]);
}

#[test]
fn test_列定义() {
    let env = ApiTestEnv::new().unwrap();
    env.register_sheet("members", &["이름", "이메일"]);

    let columns = env.registry().columns("members").unwrap();
    assert_eq!(
        columns,
        vec![ColumnSpec::from_label("이름"), ColumnSpec::from_label("이메일")]
    );

    assert!(matches!(
        env.registry().columns("unknown"),
        Err(ApiError::NotFound(_))
    ));
}
