use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
}

#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    names: Vec<ThemeName>,
}

impl ThemeRegistry {
    pub fn resolve(&self, raw: &str) -> Option<ThemeName> {
        ThemeName::from_str(raw.trim())
            .ok()
            .filter(|name| self.names.contains(name))
    }

    pub fn all(&self) -> impl Iterator<Item = &ThemeName> {
        self.names.iter()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self {
            names: ThemeName::iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_kebab_case_names() {
        let registry = ThemeRegistry::default();
        assert_eq!(registry.resolve("high-contrast"), Some(ThemeName::HighContrast));
        assert_eq!(registry.resolve(" Light "), Some(ThemeName::Light));
        assert_eq!(registry.resolve("solarized"), None);
    }

    #[test]
    fn lists_every_theme() {
        let names: Vec<String> = ThemeRegistry::default()
            .all()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["dark", "light", "high-contrast"]);
    }
}
