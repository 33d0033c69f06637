use serde::Deserialize;

use crate::model::MonetaryValue;

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// Body of the revenues report. Only the top-level `children` are read.
#[derive(Deserialize, Debug, Default)]
pub struct RevenuesReport {
    #[serde(default)]
    pub children: Vec<RevenueLine>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RevenueLine {
    pub account: Option<Account>,
    pub net_amount: Option<MonetaryValue>,
    pub gross_amount: Option<MonetaryValue>,
}

#[derive(Deserialize, Debug)]
pub struct Account {
    pub name: Option<String>,
}
