#![allow(dead_code)]

use qsar_batch::models::{LocatorRegistry, ModelLocators, ModelSet, PageLocators};
use qsar_batch::{Config, ItemFlow};

pub const TARGET_URL: &str = "https://qsar.example.org/runmodel/index.html";

pub const LOCATORS: &str = "\
accept=class:accept-terms
model_tab=/tab/models
smitab=/tab/smiles
smibox=/input/smiles
smigo=/button/smiles-go
predict=/button/predict
status=/div/status
endok=/button/end-ok
table=/div/results
";

pub const MODEL_LOCATORS: &str = "\
Skin Irritation=/model/skin
Ames Mutagenicity=/model/ames
";

/// 与 LOCATORS 中一致的选择器
pub const ACCEPT: &str = ".accept-terms";
pub const MODEL_TAB: &str = "/tab/models";
pub const SMILES_TAB: &str = "/tab/smiles";
pub const SMILES_BOX: &str = "/input/smiles";
pub const SMILES_GO: &str = "/button/smiles-go";
pub const PREDICT: &str = "/button/predict";
pub const STATUS: &str = "/div/status";
pub const END_OK: &str = "/button/end-ok";
pub const TABLE: &str = "/div/results";

pub struct Fixture {
    pub config: Config,
    pub page: PageLocators,
    pub models: ModelSet,
    pub model_locators: ModelLocators,
}

impl Fixture {
    pub fn new(models: &[&str]) -> Self {
        Self::with_config(models, base_config())
    }

    pub fn with_config(models: &[&str], config: Config) -> Self {
        Self {
            config,
            page: LocatorRegistry::parse(LOCATORS, "xpaths.ini")
                .page_locators()
                .expect("测试定位器应完整"),
            models: ModelSet::new(models.iter().copied()),
            model_locators: ModelLocators::parse(MODEL_LOCATORS).expect("测试模型定位器应合法"),
        }
    }

    pub fn flow(&self) -> ItemFlow<'_> {
        ItemFlow::new(&self.config, &self.page, &self.models, &self.model_locators)
    }
}

pub fn base_config() -> Config {
    Config {
        target_url: TARGET_URL.to_string(),
        ..Default::default()
    }
}

/// 在结果正文前加上五行面板表头
pub fn panel(body: &str) -> String {
    format!("Model results\nModel\nExperimental\nProbability\nPrediction\n{body}")
}
