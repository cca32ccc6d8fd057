//! Jupiter price API response models.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Response from `/v4/price?ids=`
#[derive(Debug, Default, Deserialize)]
pub struct JupiterPriceResponse {
    pub data: Option<HashMap<String, JupiterPrice>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JupiterPrice {
    pub price: Option<Value>,
}
