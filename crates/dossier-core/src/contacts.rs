//! The profile contacts card: field table, validation rules, the profile
//! update DTO and the [`RecordRemote`] adapter over [`ProfileService`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator as _};

use crate::{
  Error, Result,
  editable::EditableRecordController,
  record::Record,
  remote::{ProfileService, RecordRemote},
  rules::{FieldRule, FieldRules},
};

pub const EPAM_EMAIL_PATTERN: &str = r"(?i)^[\w.+-]+@epam\.com$";

// ─── Keys ────────────────────────────────────────────────────────────────────

/// One contact field. The string form is the record key.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum ContactKey {
  EpamEmail,
  Email,
  Telegram,
  Phone,
  Skype,
  WhatsApp,
  Notes,
  LinkedIn,
}

impl ContactKey {
  pub fn display_name(self) -> &'static str {
    match self {
      Self::EpamEmail => "EPAM E-mail",
      Self::Email => "E-mail",
      Self::Telegram => "Telegram",
      Self::Phone => "Phone",
      Self::Skype => "Skype",
      Self::WhatsApp => "WhatsApp",
      Self::Notes => "Notes",
      Self::LinkedIn => "LinkedIn",
    }
  }
}

/// Reshape a loaded record to exactly the contact key set; missing contacts
/// become blank and unknown keys are dropped.
pub fn contacts_record(loaded: &Record) -> Record {
  loaded.project(ContactKey::iter().map(|k| k.as_ref().to_owned()))
}

pub fn contact_rules() -> Result<FieldRules> {
  Ok(
    FieldRules::new()
      .with(
        ContactKey::EpamEmail.as_ref(),
        FieldRule::pattern(EPAM_EMAIL_PATTERN, "Please enter valid Epam email")?,
      )
      .with(ContactKey::Email.as_ref(), FieldRule::email("Email is not valid")),
  )
}

/// A filled-in contact as shown on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
  pub key:   ContactKey,
  pub name:  &'static str,
  pub value: String,
}

/// Non-empty contacts of `record`, in card order.
pub fn filled_contacts(record: &Record) -> Vec<ContactEntry> {
  ContactKey::iter()
    .filter_map(|key| {
      let value = record.get(key.as_ref()).filter(|v| !v.is_empty())?;
      Some(ContactEntry {
        key,
        name: key.display_name(),
        value: value.to_owned(),
      })
    })
    .collect()
}

// ─── Notification connections ────────────────────────────────────────────────

/// State of one notification channel (e-mail, telegram, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionValue {
  pub value:             String,
  pub enabled:           bool,
  pub last_link_sent_at: Option<DateTime<Utc>>,
}

/// Channel name → connection.
pub type Connections = BTreeMap<String, ConnectionValue>;

/// Whether the card should offer to (re)send the e-mail confirmation link.
pub fn needs_email_confirmation(connections: &Connections, editing: bool) -> bool {
  editing && !connections.get("email").is_some_and(|c| c.enabled)
}

// ─── Update DTO ──────────────────────────────────────────────────────────────

/// Partial profile update; only the contact fields are carried here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInfoDto {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_epam_email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_email:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_telegram:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_phone:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_skype:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contacts_notes:      Option<String>,
  #[serde(rename = "contactsLinkedIn", skip_serializing_if = "Option::is_none")]
  pub contacts_linked_in:  Option<String>,
  #[serde(rename = "contactsWhatsApp", skip_serializing_if = "Option::is_none")]
  pub contacts_whats_app:  Option<String>,
}

impl UpdateProfileInfoDto {
  /// Every contact of `record`, blank ones included.
  pub fn from_contacts(record: &Record) -> Self {
    let field = |key: ContactKey| Some(record.get(key.as_ref()).unwrap_or_default().to_owned());
    Self {
      contacts_epam_email: field(ContactKey::EpamEmail),
      contacts_email:      field(ContactKey::Email),
      contacts_telegram:   field(ContactKey::Telegram),
      contacts_phone:      field(ContactKey::Phone),
      contacts_skype:      field(ContactKey::Skype),
      contacts_notes:      field(ContactKey::Notes),
      contacts_linked_in:  field(ContactKey::LinkedIn),
      contacts_whats_app:  field(ContactKey::WhatsApp),
    }
  }

  /// Apply the fields present in this update to a contacts record.
  pub fn apply_to(&self, record: &mut Record) {
    let pairs = [
      (ContactKey::EpamEmail, &self.contacts_epam_email),
      (ContactKey::Email, &self.contacts_email),
      (ContactKey::Telegram, &self.contacts_telegram),
      (ContactKey::Phone, &self.contacts_phone),
      (ContactKey::Skype, &self.contacts_skype),
      (ContactKey::Notes, &self.contacts_notes),
      (ContactKey::LinkedIn, &self.contacts_linked_in),
      (ContactKey::WhatsApp, &self.contacts_whats_app),
    ];
    for (key, value) in pairs {
      if let Some(value) = value {
        record.insert(key.as_ref(), value.clone());
      }
    }
  }
}

// ─── Remote adapter ──────────────────────────────────────────────────────────

/// Saves a contacts draft through [`ProfileService::update_profile`]. The
/// profile endpoint answers with a bare success flag, so on success the draft
/// itself is the canonical record.
pub struct ContactsRemote<P> {
  profile:   P,
  github_id: String,
}

impl<P: ProfileService> ContactsRemote<P> {
  pub fn new(profile: P, github_id: impl Into<String>) -> Self {
    Self { profile, github_id: github_id.into() }
  }

  pub fn github_id(&self) -> &str { &self.github_id }

  pub fn profile(&self) -> &P { &self.profile }

  pub async fn connections(&self) -> Result<Connections> {
    self
      .profile
      .get_connections(&self.github_id)
      .await
      .map_err(Error::remote)
  }

  pub async fn send_confirmation_email(&self) -> Result<()> {
    self
      .profile
      .send_confirmation_email(&self.github_id)
      .await
      .map_err(Error::remote)
  }
}

impl<P: ProfileService> RecordRemote for ContactsRemote<P> {
  async fn save_record(&self, draft: &Record) -> Result<Record> {
    let update = UpdateProfileInfoDto::from_contacts(draft);
    let updated = self
      .profile
      .update_profile(&self.github_id, &update)
      .await
      .map_err(Error::remote)?;
    if !updated {
      return Err(Error::Rejected);
    }
    Ok(draft.clone())
  }
}

/// Load the contacts of `github_id` and wrap them in a controller with the
/// card's validation rules.
pub async fn load_contacts_controller<P: ProfileService>(
  profile: P,
  github_id: &str,
) -> Result<EditableRecordController<ContactsRemote<P>>> {
  let loaded = profile
    .get_contacts(github_id)
    .await
    .map_err(Error::remote)?;
  let remote = ContactsRemote::new(profile, github_id);
  Ok(
    EditableRecordController::new(contacts_record(&loaded), remote)
      .with_rules(contact_rules()?),
  )
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn keys_use_camel_case_record_names() {
    let names: Vec<_> = ContactKey::iter().map(|k| k.as_ref().to_owned()).collect();
    assert_eq!(
      names,
      [
        "epamEmail", "email", "telegram", "phone", "skype", "whatsApp",
        "notes", "linkedIn"
      ]
    );
    assert_eq!("linkedIn".parse::<ContactKey>().unwrap(), ContactKey::LinkedIn);
  }

  #[test]
  fn contacts_record_has_exact_shape() {
    let loaded: Record = [("telegram", "@ann"), ("github", "ann")]
      .into_iter()
      .collect();
    let record = contacts_record(&loaded);
    assert_eq!(record.len(), 8);
    assert_eq!(record.get("telegram"), Some("@ann"));
    assert_eq!(record.get("email"), Some(""));
    assert!(!record.contains_key("github"));
  }

  #[test]
  fn filled_contacts_skips_blank_values() {
    let mut record = contacts_record(&Record::new());
    record.set("linkedIn", "https://linkedin.com/in/ann").unwrap();
    record.set("email", "ann@example.com").unwrap();

    let filled = filled_contacts(&record);
    let names: Vec<_> = filled.iter().map(|c| c.name).collect();
    assert_eq!(names, ["E-mail", "LinkedIn"]);
  }

  #[test]
  fn epam_email_rule() {
    let rules = contact_rules().unwrap();
    assert!(rules.validate_field("epamEmail", "Ann_Smith@epam.com").is_empty());
    let errors = rules.validate_field("epamEmail", "ann@gmail.com");
    assert_eq!(errors[0].message, "Please enter valid Epam email");
  }

  #[test]
  fn update_dto_wire_names() {
    let mut record = contacts_record(&Record::new());
    record.set("whatsApp", "+100").unwrap();
    let json = serde_json::to_value(UpdateProfileInfoDto::from_contacts(&record)).unwrap();
    assert_eq!(json["contactsWhatsApp"], "+100");
    assert_eq!(json["contactsLinkedIn"], "");
    assert_eq!(json["contactsEpamEmail"], "");
  }

  #[test]
  fn email_confirmation_only_offered_while_editing_unconfirmed() {
    let mut connections = Connections::new();
    assert!(needs_email_confirmation(&connections, true));
    assert!(!needs_email_confirmation(&connections, false));

    connections.insert("email".into(), ConnectionValue {
      value: "ann@example.com".into(),
      enabled: true,
      last_link_sent_at: None,
    });
    assert!(!needs_email_confirmation(&connections, true));
  }
}
