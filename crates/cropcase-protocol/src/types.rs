//! Wire types for the storefront REST API.
//!
//! Every struct here mirrors a JSON shape produced or consumed by the
//! backend, field for field, in snake_case. The backend is the authority on
//! all economic values — these types carry its answers, they never compute
//! their own.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// A newtype wrapper over the backend's numeric id. Wrapping buys type
/// safety (a `UserId` can't be passed where a [`CaseId`] is expected) at
/// zero runtime cost. `#[serde(transparent)]` keeps the JSON a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a case (a purchasable reward container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub u64);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A unique identifier for a reward item (a "vegetable").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V-{}", self.0)
    }
}

/// A unique identifier for an inventory entry (one stack of a won item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// How rare a reward item is.
///
/// The derive order doubles as the rarity order: `Common < Uncommon < Rare
/// < Epic < Legendary` (via `PartialOrd`/`Ord`), which is what UIs sort by.
/// On the wire these are lowercase strings, matching the backend's enum.
///
/// The backend also sends a human-readable `rarity_display` label alongside
/// (see [`RewardItem`]); the client carries that verbatim rather than
/// re-rendering it, so server-side copy changes don't need a client release.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Uncommon => write!(f, "uncommon"),
            Self::Rare => write!(f, "rare"),
            Self::Epic => write!(f, "epic"),
            Self::Legendary => write!(f, "legendary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// A single reward item ("vegetable"): an individual prize with a rarity
/// and a resale price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    pub id: ItemId,
    pub name: String,
    /// Visual reference rendered by the UI (the backend ships emoji).
    pub emoji: String,
    pub rarity: Rarity,
    /// Server-rendered rarity label, carried verbatim.
    pub rarity_display: String,
    #[serde(default)]
    pub description: String,
    /// Resale price in coins. Zero is legal (a booby prize).
    pub price: u64,
}

/// A purchasable case: a fixed price and a pool of possible rewards.
///
/// Read-only reference data — immutable once fetched. Which reward actually
/// drops, and at what odds, is decided server-side; the client only uses
/// the pool to draw *decoys* for the reveal animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price of one open, in coins. The backend never lists zero-priced
    /// cases.
    pub price: u64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// The reward pool. Order is irrelevant.
    pub vegetables: Vec<RewardItem>,
    /// The backend only lists active cases; the flag still travels so a
    /// cached case can be recognized as retired after a catalog refresh.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Identity & profile
// ---------------------------------------------------------------------------

/// The public identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// The wallet attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Coin balance. Always the server's most recently confirmed value.
    pub balance: u64,
}

/// The `/auth/me/` payload: the user plus their embedded profile.
///
/// `#[serde(flatten)]` lifts the [`User`] fields to the top level, matching
/// the backend's `{ "id": …, "username": …, "email": …, "profile": { … } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub user: User,
    pub profile: Profile,
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

/// The `/auth/login/` payload: a fresh access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// The `/auth/refresh/` payload: a new access token, and a rotated refresh
/// token when the backend is configured to rotate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ---------------------------------------------------------------------------
// Transaction results
// ---------------------------------------------------------------------------

/// The outcome of one case-open transaction.
///
/// Produced once per open request and consumed by the UI. `reward` and
/// `new_balance` are the *authoritative* values — whatever the reveal
/// animation shows, only these are ever committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub reward: Option<RewardItem>,
    /// Absent on older backend builds; settlement skips the balance write
    /// when the server didn't send one.
    #[serde(default)]
    pub new_balance: Option<u64>,
}

/// One stack of a won item in the user's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: EntryId,
    pub item: RewardItem,
    /// At least 1 — the backend deletes emptied entries.
    pub quantity: u32,
}

/// The deposit/sell response: the authoritative post-transaction balance
/// plus a display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReceipt {
    pub new_balance: u64,
    pub message: String,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! JSON-shape tests for the wire types.
    //!
    //! The backend defines the exact JSON; these tests pin our serde
    //! attributes to it, because a silent mismatch means every response
    //! fails to decode.

    use super::*;

    fn carrot() -> RewardItem {
        RewardItem {
            id: ItemId(7),
            name: "Carrot".into(),
            emoji: "🥕".into(),
            rarity: Rarity::Uncommon,
            rarity_display: "🥕 Uncommon".into(),
            description: String::new(),
            price: 25,
        }
    }

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        // `#[serde(transparent)]` — CaseId(3) must be `3`, not `{"0":3}`.
        assert_eq!(serde_json::to_string(&CaseId(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ItemId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EntryId(9)).unwrap(), "9");
        assert_eq!(serde_json::to_string(&UserId(1)).unwrap(), "1");
    }

    #[test]
    fn test_ids_deserialize_from_plain_numbers() {
        let id: CaseId = serde_json::from_str("42").unwrap();
        assert_eq!(id, CaseId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId(1).to_string(), "U-1");
        assert_eq!(CaseId(3).to_string(), "C-3");
        assert_eq!(ItemId(7).to_string(), "V-7");
        assert_eq!(EntryId(9).to_string(), "E-9");
    }

    // =====================================================================
    // Rarity
    // =====================================================================

    #[test]
    fn test_rarity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rarity::Common).unwrap(), "\"common\"");
        assert_eq!(
            serde_json::to_string(&Rarity::Legendary).unwrap(),
            "\"legendary\""
        );
    }

    #[test]
    fn test_rarity_deserializes_from_backend_strings() {
        for (text, expected) in [
            ("\"common\"", Rarity::Common),
            ("\"uncommon\"", Rarity::Uncommon),
            ("\"rare\"", Rarity::Rare),
            ("\"epic\"", Rarity::Epic),
            ("\"legendary\"", Rarity::Legendary),
        ] {
            let rarity: Rarity = serde_json::from_str(text).unwrap();
            assert_eq!(rarity, expected);
        }
    }

    #[test]
    fn test_rarity_unknown_value_fails_to_decode() {
        let result: Result<Rarity, _> = serde_json::from_str("\"mythic\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_rarity_ordering_common_to_legendary() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    // =====================================================================
    // Catalog types
    // =====================================================================

    #[test]
    fn test_reward_item_decodes_backend_shape() {
        let json = r#"{
            "id": 7,
            "name": "Carrot",
            "emoji": "🥕",
            "rarity": "uncommon",
            "rarity_display": "🥕 Uncommon",
            "description": "",
            "price": 25
        }"#;
        let item: RewardItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, carrot());
    }

    #[test]
    fn test_reward_item_description_defaults_to_empty() {
        let json = r#"{
            "id": 1, "name": "Potato", "emoji": "🥔",
            "rarity": "common", "rarity_display": "🥔 Common", "price": 5
        }"#;
        let item: RewardItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_case_decodes_with_nested_pool() {
        let json = r#"{
            "id": 3,
            "name": "Garden Crate",
            "description": "Everyday produce",
            "price": 100,
            "image_url": null,
            "vegetables": [{
                "id": 7, "name": "Carrot", "emoji": "🥕",
                "rarity": "uncommon", "rarity_display": "🥕 Uncommon",
                "description": "", "price": 25
            }],
            "is_active": true
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.id, CaseId(3));
        assert_eq!(case.price, 100);
        assert_eq!(case.vegetables, vec![carrot()]);
        assert!(case.is_active);
    }

    #[test]
    fn test_case_optional_fields_default() {
        // Older backend builds omit description/image_url/is_active.
        let json = r#"{
            "id": 3, "name": "Garden Crate", "price": 100, "vegetables": []
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.description, "");
        assert!(case.image_url.is_none());
        assert!(case.is_active, "is_active must default to true");
    }

    // =====================================================================
    // Identity & tokens
    // =====================================================================

    #[test]
    fn test_account_flattens_user_fields() {
        // /auth/me/ puts id/username/email at the top level with the
        // profile nested — `#[serde(flatten)]` must match that exactly.
        let json = r#"{
            "id": 1,
            "username": "ferris",
            "email": "ferris@example.com",
            "profile": { "balance": 500 }
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.user.id, UserId(1));
        assert_eq!(account.user.username, "ferris");
        assert_eq!(account.profile.balance, 500);
    }

    #[test]
    fn test_account_round_trip() {
        let account = Account {
            user: User {
                id: UserId(1),
                username: "ferris".into(),
                email: "ferris@example.com".into(),
            },
            profile: Profile { balance: 500 },
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["username"], "ferris");
        assert_eq!(json["profile"]["balance"], 500);
        let decoded: Account = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, account);
    }

    #[test]
    fn test_token_pair_decodes_login_response() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access": "acc-1", "refresh": "ref-1"}"#).unwrap();
        assert_eq!(pair.access, "acc-1");
        assert_eq!(pair.refresh, "ref-1");
    }

    #[test]
    fn test_token_refresh_without_rotation() {
        let refreshed: TokenRefresh = serde_json::from_str(r#"{"access": "acc-2"}"#).unwrap();
        assert_eq!(refreshed.access, "acc-2");
        assert!(refreshed.refresh.is_none());
    }

    #[test]
    fn test_token_refresh_with_rotation() {
        let refreshed: TokenRefresh =
            serde_json::from_str(r#"{"access": "acc-2", "refresh": "ref-2"}"#).unwrap();
        assert_eq!(refreshed.refresh.as_deref(), Some("ref-2"));
    }

    // =====================================================================
    // Transaction results
    // =====================================================================

    #[test]
    fn test_open_result_success_shape() {
        let json = r#"{
            "success": true,
            "message": "🎉 Opened Garden Crate!",
            "reward": {
                "id": 7, "name": "Carrot", "emoji": "🥕",
                "rarity": "uncommon", "rarity_display": "🥕 Uncommon",
                "description": "", "price": 25
            },
            "new_balance": 400
        }"#;
        let result: OpenResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.reward, Some(carrot()));
        assert_eq!(result.new_balance, Some(400));
    }

    #[test]
    fn test_open_result_failure_has_no_reward_or_balance() {
        let json = r#"{"success": false, "message": "The case is empty"}"#;
        let result: OpenResult = serde_json::from_str(json).unwrap();
        assert!(!result.success);
        assert!(result.reward.is_none());
        assert!(result.new_balance.is_none());
    }

    #[test]
    fn test_inventory_entry_round_trip() {
        let entry = InventoryEntry {
            id: EntryId(9),
            item: carrot(),
            quantity: 3,
        };
        let bytes = serde_json::to_vec(&entry).unwrap();
        let decoded: InventoryEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_balance_receipt_decodes() {
        let receipt: BalanceReceipt =
            serde_json::from_str(r#"{"new_balance": 1500, "message": "Deposited 1000 coins"}"#)
                .unwrap();
        assert_eq!(receipt.new_balance, 1500);
        assert_eq!(receipt.message, "Deposited 1000 coins");
    }
}
