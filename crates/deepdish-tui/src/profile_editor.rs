//! In-memory editor for the user profile.

use crate::ui::widgets::TextInputState;
use deepdish_engine::UserProfile;

/// Field that receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    Name,
    Allergies,
}

/// Edits name and allergies; the city is left to the locator.
#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    pub name: TextInputState,
    pub allergies: TextInputState,
    pub focus: ProfileField,
}

impl ProfileEditor {
    /// Start editing `profile`.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: TextInputState::with_content(&profile.name),
            allergies: TextInputState::with_content(&profile.allergy_list()),
            focus: ProfileField::Name,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextInputState {
        match self.focus {
            ProfileField::Name => &mut self.name,
            ProfileField::Allergies => &mut self.allergies,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ProfileField::Name => ProfileField::Allergies,
            ProfileField::Allergies => ProfileField::Name,
        };
    }

    /// `base` with the edited fields applied and normalised.
    pub fn apply_to(&self, base: &UserProfile) -> UserProfile {
        let mut profile = base.clone();
        profile.name = self.name.content().to_string();
        profile.set_allergies_from_list(self.allergies.content());
        profile.normalized()
    }
}
