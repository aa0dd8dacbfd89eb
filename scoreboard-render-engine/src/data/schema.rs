use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use scoreboard_constants::category::UNCATEGORIZED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChallengeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AccountId(pub u64);

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ids arrive as numbers from the API but as strings from some host pages.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Point values and scores, which some deployments serialize as strings.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Standard `{ success, data }` response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub solves: Option<u64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub account_id: Option<u64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub score: Option<i64>,
    pub pos: Option<u32>,
}

/// Team or user payload embedded in a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPayload {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// Challenge payload embedded in a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengePayload {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub account_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub team_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub challenge_id: Option<u64>,
    pub date: Option<String>,
    pub team: Option<AccountPayload>,
    pub user: Option<AccountPayload>,
    pub challenge: Option<ChallengePayload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    pub id: ChallengeId,
    pub name: String,
    pub category: String,
    pub value: i64,
    pub solves: u64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub account_id: AccountId,
    pub name: Option<String>,
    pub score: i64,
}

/// Minimal team identity carried by a solve event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRef {
    pub account_id: AccountId,
    pub name: String,
}

/// Minimal challenge identity carried by a solve event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeRef {
    pub id: ChallengeId,
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionKind {
    Correct,
    Other(String),
}

/// Identity of a scoring event: account, challenge and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionKey(String);

impl SubmissionKey {
    pub fn new(account: AccountId, challenge: ChallengeId, date: &str) -> Self {
        Self(format!("{}-{}-{}", account, challenge, date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: SubmissionKind,
    pub account: AccountId,
    pub challenge_id: ChallengeId,
    pub date: String,
    /// Embedded team payload, present only when it carries a name.
    pub team: Option<TeamRef>,
    /// Embedded challenge payload, present only when it carries a name.
    pub challenge: Option<ChallengeRef>,
}

impl Submission {
    pub fn key(&self) -> SubmissionKey {
        SubmissionKey::new(self.account, self.challenge_id, &self.date)
    }

    pub fn is_correct(&self) -> bool {
        self.kind == SubmissionKind::Correct
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntity {
    #[error("{kind} record has no identifier")]
    MissingId { kind: &'static str },
    #[error("{kind} record is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("record could not be decoded: {0}")]
    Undecodable(String),
}

/// Boundary validation from a wire record to a domain type.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, MalformedEntity>;
}

impl Validate for ChallengeRecord {
    type Output = Challenge;

    fn validate(self) -> Result<Challenge, MalformedEntity> {
        let id = self.id.ok_or(MalformedEntity::MissingId { kind: "challenge" })?;
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Ok(Challenge {
            id: ChallengeId(id),
            name: self.name.unwrap_or_else(|| format!("Challenge {id}")),
            category,
            value: self.value.unwrap_or(0),
            solves: self.solves.unwrap_or(0),
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

impl Validate for TeamRecord {
    type Output = Team;

    fn validate(self) -> Result<Team, MalformedEntity> {
        let id = self.account_id.ok_or(MalformedEntity::MissingId { kind: "team" })?;
        Ok(Team {
            account_id: AccountId(id),
            name: self.name.filter(|n| !n.trim().is_empty()),
            score: self.score.unwrap_or(0),
        })
    }
}

impl Validate for SubmissionRecord {
    type Output = Submission;

    fn validate(self) -> Result<Submission, MalformedEntity> {
        let account = self
            .account_id
            .or(self.team_id)
            .or(self.user_id)
            .map(AccountId)
            .ok_or(MalformedEntity::MissingId { kind: "submission account" })?;
        let challenge_id = self
            .challenge_id
            .or_else(|| self.challenge.as_ref().and_then(|c| c.id))
            .map(ChallengeId)
            .ok_or(MalformedEntity::MissingId { kind: "submission challenge" })?;
        let date = self
            .date
            .filter(|d| !d.is_empty())
            .ok_or(MalformedEntity::MissingField {
                kind: "submission",
                field: "date",
            })?;

        let kind = match self.kind.as_deref() {
            Some("correct") => SubmissionKind::Correct,
            Some(other) => SubmissionKind::Other(other.to_string()),
            None => SubmissionKind::Other(String::new()),
        };

        let team_account = self.team_id.or(self.user_id).map(AccountId).unwrap_or(account);
        let team = self
            .team
            .or(self.user)
            .and_then(|payload| payload.name)
            .map(|name| TeamRef {
                account_id: team_account,
                name,
            });

        let challenge = self.challenge.and_then(|payload| {
            payload.name.map(|name| ChallengeRef {
                id: challenge_id,
                name,
                value: payload.value.unwrap_or(0),
            })
        });

        Ok(Submission {
            kind,
            account,
            challenge_id,
            date,
            team,
            challenge,
        })
    }
}

/// Valid items of a batch plus the records that were dropped.
#[derive(Debug)]
pub struct Validated<T> {
    pub items: Vec<T>,
    pub skipped: Vec<MalformedEntity>,
}

pub fn validate_all<R: Validate>(records: Vec<R>) -> Validated<R::Output> {
    let mut items = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        match record.validate() {
            Ok(item) => items.push(item),
            Err(reason) => skipped.push(reason),
        }
    }

    Validated { items, skipped }
}

/// Decode each raw record on its own so a single bad record cannot take
/// the rest of the batch down with it.
pub fn decode_all<R>(values: Vec<serde_json::Value>) -> Validated<R::Output>
where
    R: Validate + DeserializeOwned,
{
    let mut records = Vec::with_capacity(values.len());
    let mut undecodable = Vec::new();
    for value in values {
        match serde_json::from_value::<R>(value) {
            Ok(record) => records.push(record),
            Err(err) => undecodable.push(MalformedEntity::Undecodable(err.to_string())),
        }
    }

    let mut batch = validate_all(records);
    batch.skipped.extend(undecodable);
    batch
}
