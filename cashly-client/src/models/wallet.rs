use serde::{Deserialize, Serialize};

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    pub balance: f64,
    pub currency: String,
    /// Shared with the members of a family
    #[serde(default)]
    pub is_family: bool,
    #[serde(default)]
    pub members: Vec<FamilyWalletMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct FamilyWalletMember {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub is_owner: bool,
}

impl Wallet {
    pub fn owner(&self) -> Option<&FamilyWalletMember> {
        self.members.iter().find(|member| member.is_owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_wallet_defaults() {
        let wallet: Wallet = serde_json::from_str(
            r#"{ "id": 1, "name": "Cash", "balance": 120.5, "currency": "EUR" }"#,
        )
        .unwrap();

        assert!(!wallet.is_family);
        assert!(wallet.members.is_empty());
        assert!(wallet.owner().is_none());
    }

    #[test]
    fn test_family_wallet_owner() {
        let wallet: Wallet = serde_json::from_str(
            r#"{
                "id": 2, "name": "Household", "balance": 900.0, "currency": "EUR",
                "isFamily": true,
                "members": [
                    { "userId": 10, "name": "Alex" },
                    { "userId": 11, "name": "Sam", "isOwner": true }
                ]
            }"#,
        )
        .unwrap();

        assert!(wallet.is_family);
        assert_eq!(wallet.owner().map(|owner| owner.user_id), Some(11));
    }
}
