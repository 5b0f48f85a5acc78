use rust_decimal::Decimal;
use salario_core::{AppSettings, Currency, EmployeeStatus, PayrollError};
use salario_storage::{
    EmployeeRepository, JsonFileStore, SettingsRepository, Store, EMPLOYEES_FILE, SETTINGS_FILE,
};
use salario_tests::{sample_roster, scratch_dir};

#[tokio::test]
async fn json_store_starts_with_defaults() {
    let dir = scratch_dir();
    let store = Store::json(&dir).await.unwrap();

    assert!(store.list_employees().await.unwrap().is_empty());
    assert_eq!(store.load_settings().await.unwrap(), AppSettings::default());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn json_store_persists_between_opens() {
    let dir = scratch_dir();
    let store = JsonFileStore::open(&dir).await.unwrap();

    let mut roster = sample_roster();
    roster[2].status = EmployeeStatus::OnLeave;
    store.replace_employees(&roster).await.unwrap();

    let settings = AppSettings {
        monthly_budget: Decimal::from(750_000),
        tax_rate: Decimal::new(125, 1),
        currency: Currency::Eur,
    };
    store.save_settings(&settings).await.unwrap();

    let reopened = JsonFileStore::open(&dir).await.unwrap();
    assert_eq!(reopened.list_employees().await.unwrap(), roster);
    assert_eq!(reopened.load_settings().await.unwrap(), settings);

    let raw = std::fs::read_to_string(dir.join(EMPLOYEES_FILE)).unwrap();
    assert!(raw.contains("\"fullName\""));
    assert!(raw.contains("\"On Leave\""));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn malformed_settings_fall_back_to_defaults() {
    let dir = scratch_dir();
    let store = JsonFileStore::open(&dir).await.unwrap();
    std::fs::write(dir.join(SETTINGS_FILE), "{ not json").unwrap();

    assert_eq!(store.load_settings().await.unwrap(), AppSettings::default());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn reads_settings_written_with_plain_numbers() {
    let dir = scratch_dir();
    let store = JsonFileStore::open(&dir).await.unwrap();
    std::fs::write(
        dir.join(SETTINGS_FILE),
        r#"{"monthlyBudget":500000,"taxRate":18,"currency":"USD"}"#,
    )
    .unwrap();

    let settings = store.load_settings().await.unwrap();
    assert_eq!(settings.monthly_budget, Decimal::from(500_000));
    assert_eq!(settings.currency, Currency::Usd);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn invalid_settings_are_not_saved() {
    let store = Store::memory();
    let settings = AppSettings {
        monthly_budget: Decimal::from(-5),
        ..AppSettings::default()
    };

    let error = store.save_settings(&settings).await.unwrap_err();
    assert!(matches!(
        error.downcast_ref::<PayrollError>(),
        Some(PayrollError::InvalidConfiguration(_))
    ));
    assert_eq!(store.load_settings().await.unwrap(), AppSettings::default());
}

#[tokio::test]
async fn memory_store_replaces_roster() {
    let store = Store::memory();
    store.replace_employees(&sample_roster()).await.unwrap();
    assert_eq!(store.list_employees().await.unwrap().len(), 3);

    store.replace_employees(&[]).await.unwrap();
    assert!(store.list_employees().await.unwrap().is_empty());
}
