use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use salario_core::{AppSettings, Employee};
use tokio::fs;
use tracing::{info, warn};

pub const EMPLOYEES_FILE: &str = "salario_employees.json";
pub const SETTINGS_FILE: &str = "salario_settings.json";

pub trait EmployeeRepository: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>>;
    async fn replace_employees(&self, employees: &[Employee]) -> Result<()>;
}

pub trait SettingsRepository: Send + Sync {
    async fn load_settings(&self) -> Result<AppSettings>;
    /// Validates before persisting; invalid settings are never written.
    async fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    employees: Arc<RwLock<Vec<Employee>>>,
    settings: Arc<RwLock<Option<AppSettings>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmployeeRepository for MemoryStore {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        Ok(self.employees.read().clone())
    }

    async fn replace_employees(&self, employees: &[Employee]) -> Result<()> {
        *self.employees.write() = employees.to_vec();
        Ok(())
    }
}

impl SettingsRepository for MemoryStore {
    async fn load_settings(&self) -> Result<AppSettings> {
        Ok(self.settings.read().clone().unwrap_or_default())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;
        *self.settings.write() = Some(settings.clone());
        Ok(())
    }
}

/// Keeps each collection in its own JSON document under a data directory.
#[derive(Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed creating data directory {}", root.display()))?;
        Ok(Self { root })
    }

    async fn read_optional(&self, name: &str) -> Result<Option<String>> {
        let path = self.root.join(name);
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => {
                Err(error).with_context(|| format!("failed reading {}", path.display()))
            }
        }
    }

    async fn write_atomic(&self, name: &str, contents: String) -> Result<()> {
        let path = self.root.join(name);
        let staging = self.root.join(format!("{name}.tmp"));
        fs::write(&staging, contents)
            .await
            .with_context(|| format!("failed writing {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("failed replacing {}", path.display()))?;
        Ok(())
    }
}

impl EmployeeRepository for JsonFileStore {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let Some(raw) = self.read_optional(EMPLOYEES_FILE).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing {}", self.root.join(EMPLOYEES_FILE).display()))
    }

    async fn replace_employees(&self, employees: &[Employee]) -> Result<()> {
        let raw = serde_json::to_string_pretty(employees)?;
        self.write_atomic(EMPLOYEES_FILE, raw).await?;
        info!(count = employees.len(), "employees saved");
        Ok(())
    }
}

impl SettingsRepository for JsonFileStore {
    async fn load_settings(&self) -> Result<AppSettings> {
        let Some(raw) = self.read_optional(SETTINGS_FILE).await? else {
            return Ok(AppSettings::default());
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                warn!(error = %error, "failed to parse settings, using defaults");
                Ok(AppSettings::default())
            }
        }
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;
        let raw = serde_json::to_string_pretty(settings)?;
        self.write_atomic(SETTINGS_FILE, raw).await?;
        info!(
            monthly_budget = %settings.monthly_budget,
            tax_rate = %settings.tax_rate,
            currency = settings.currency.as_code(),
            "settings saved"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Json(JsonFileStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn json(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::Json(JsonFileStore::open(root).await?))
    }
}

impl EmployeeRepository for Store {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        match self {
            Store::Memory(store) => store.list_employees().await,
            Store::Json(store) => store.list_employees().await,
        }
    }

    async fn replace_employees(&self, employees: &[Employee]) -> Result<()> {
        match self {
            Store::Memory(store) => store.replace_employees(employees).await,
            Store::Json(store) => store.replace_employees(employees).await,
        }
    }
}

impl SettingsRepository for Store {
    async fn load_settings(&self) -> Result<AppSettings> {
        match self {
            Store::Memory(store) => store.load_settings().await,
            Store::Json(store) => store.load_settings().await,
        }
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        match self {
            Store::Memory(store) => store.save_settings(settings).await,
            Store::Json(store) => store.save_settings(settings).await,
        }
    }
}
