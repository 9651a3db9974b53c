use crate::detection::is_spam;
use crate::localization::Lang;
use crate::reply::Reply;
use crate::store::{ClientProfile, Role};

pub const TRANSLATOR_FOUND_PHRASES: [&str; 4] = [
    "переводчик найден",
    "translator found",
    "нашел переводчика",
    "нашла переводчика",
];

pub const NEED_REPLACEMENT_PHRASES: [&str; 4] = [
    "нужна замена",
    "need replacement",
    "ищу замену",
    "требуется замена",
];

/// everything the policy needs to know about the sender of a group message
#[derive(Debug, Clone, Default)]
pub struct SenderStatus {
    pub role: Option<Role>,
    pub client_profile: Option<ClientProfile>,
    /// the sender exceeded the per-minute message ceiling
    pub flooding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    TranslatorFound,
    Spam,
    /// a translator asking for a replacement, allowed without a reply
    ReplacementRequest,
    TranslatorRestricted,
    RegistrationRequired,
    VerificationRequired,
    Allowed,
}

impl Verdict {
    /// the reply the bot posts in the group, if any
    pub fn reply(&self, lang: Lang) -> Option<Reply> {
        match self {
            Verdict::TranslatorFound => Some(Reply::plain(lang.translator_found())),
            Verdict::Spam => Some(Reply::plain(lang.spam_warning())),
            Verdict::TranslatorRestricted => {
                Some(Reply::quoted(lang.translator_group_restriction()))
            }
            Verdict::RegistrationRequired => Some(Reply::quoted(lang.registration_required())),
            Verdict::VerificationRequired => {
                Some(Reply::quoted(lang.client_verification_required()))
            }
            Verdict::ReplacementRequest | Verdict::Allowed => None,
        }
    }
}

fn contains_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

/// decides what happens to a free-text group message; the first matching rule wins
pub fn evaluate(text: &str, sender: &SenderStatus) -> Verdict {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, &TRANSLATOR_FOUND_PHRASES) {
        return Verdict::TranslatorFound;
    }

    if sender.flooding || is_spam(text) {
        return Verdict::Spam;
    }

    let replacement_needed = contains_any(&lowered, &NEED_REPLACEMENT_PHRASES);

    match sender.role {
        Some(Role::Translator) if replacement_needed => Verdict::ReplacementRequest,
        Some(Role::Translator) => Verdict::TranslatorRestricted,
        None => Verdict::RegistrationRequired,
        Some(Role::Client) => match &sender.client_profile {
            Some(profile) if profile.registration_complete => Verdict::Allowed,
            _ => Verdict::VerificationRequired,
        },
    }
}
