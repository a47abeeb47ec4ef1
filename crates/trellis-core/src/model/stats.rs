use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::form::FormCategory;

/// Count of active forms filed under one taxonomy category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryStats {
    pub name: FormCategory,
    pub count: u64,
}
