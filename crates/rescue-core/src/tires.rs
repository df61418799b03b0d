//! Tire size compatibility table.
//!
//! Widths map to the aspect ratios and rim diameters stocked for them. The
//! table is product data and is kept exactly as the shop supplies it.

use crate::error::ValidationError;

/// Aspect ratios and diameters offered for one tire width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TireWidth {
    pub width: &'static str,
    pub aspect_ratios: &'static [&'static str],
    pub diameters: &'static [&'static str],
}

const fn width(
    width: &'static str,
    aspect_ratios: &'static [&'static str],
    diameters: &'static [&'static str],
) -> TireWidth {
    TireWidth {
        width,
        aspect_ratios,
        diameters,
    }
}

/// All stocked widths in ascending order.
pub static TIRE_WIDTHS: &[TireWidth] = &[
    width("155", &["55", "60", "65", "70", "80"], &["12", "13", "14", "15"]),
    width("165", &["50", "55", "60", "65", "70", "80"], &["13", "14", "15"]),
    width("175", &["50", "55", "60", "65", "70", "80"], &["13", "14", "15", "16"]),
    width("185", &["50", "55", "60", "65", "70", "75", "80"], &["14", "15", "16"]),
    width(
        "195",
        &["45", "50", "55", "60", "65", "70", "75", "80"],
        &["14", "15", "16", "17"],
    ),
    width(
        "205",
        &["40", "45", "50", "55", "60", "65", "70", "75"],
        &["15", "16", "17", "18"],
    ),
    width(
        "215",
        &["35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["16", "17", "18", "19"],
    ),
    width(
        "225",
        &["35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["16", "17", "18", "19", "20"],
    ),
    width(
        "235",
        &["35", "40", "45", "50", "55", "60", "65", "70", "75", "80"],
        &["17", "18", "19", "20", "21"],
    ),
    width(
        "245",
        &["30", "35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["17", "18", "19", "20", "21"],
    ),
    width(
        "255",
        &["30", "35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["17", "18", "19", "20", "21", "22"],
    ),
    width(
        "265",
        &["30", "35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["17", "18", "19", "20", "21", "22"],
    ),
    width(
        "275",
        &["30", "35", "40", "45", "50", "55", "60", "65", "70"],
        &["17", "18", "19", "20", "21", "22", "23"],
    ),
    width(
        "285",
        &["30", "35", "40", "45", "50", "55", "60", "65", "70", "75"],
        &["18", "19", "20", "21", "22", "23"],
    ),
    width("295", &["25", "30", "35", "40", "45", "50"], &["19", "20", "21", "22"]),
    width(
        "305",
        &["25", "30", "35", "40", "45", "50"],
        &["19", "20", "21", "22", "23"],
    ),
    width(
        "315",
        &["25", "30", "35", "40", "70", "75"],
        &["18", "19", "20", "21", "22", "23"],
    ),
    width("325", &["25", "30", "35", "40"], &["19", "20", "21", "22", "23"]),
    width("335", &["25", "30", "35"], &["19", "20", "21", "22", "23"]),
    width("345", &["25", "30", "35"], &["19", "20", "21"]),
];

/// Look up the options for a width.
pub fn lookup(width: &str) -> Option<&'static TireWidth> {
    TIRE_WIDTHS.iter().find(|entry| entry.width == width)
}

/// Iterate the stocked widths.
pub fn widths() -> impl Iterator<Item = &'static str> {
    TIRE_WIDTHS.iter().map(|entry| entry.width)
}

/// Dependent width / aspect ratio / diameter selection.
///
/// Choosing a width always clears the two dependent fields, whether or not the
/// width changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TireSelection {
    width: Option<&'static TireWidth>,
    aspect_ratio: Option<&'static str>,
    diameter: Option<&'static str>,
}

impl TireSelection {
    /// Select a width, resetting aspect ratio and diameter.
    pub fn select_width(&mut self, width: &str) -> Result<(), ValidationError> {
        self.aspect_ratio = None;
        self.diameter = None;
        self.width = None;

        let entry = lookup(width.trim())
            .ok_or_else(|| ValidationError::UnsupportedTireSize(width.to_string()))?;
        self.width = Some(entry);
        Ok(())
    }

    /// Select an aspect ratio offered for the current width.
    pub fn select_aspect_ratio(&mut self, ratio: &str) -> Result<(), ValidationError> {
        let ratio = self
            .aspect_ratios()
            .iter()
            .copied()
            .find(|r| *r == ratio.trim())
            .ok_or_else(|| ValidationError::UnsupportedTireSize(ratio.to_string()))?;
        self.aspect_ratio = Some(ratio);
        Ok(())
    }

    /// Select a diameter offered for the current width.
    pub fn select_diameter(&mut self, diameter: &str) -> Result<(), ValidationError> {
        let diameter = self
            .diameters()
            .iter()
            .copied()
            .find(|d| *d == diameter.trim())
            .ok_or_else(|| ValidationError::UnsupportedTireSize(diameter.to_string()))?;
        self.diameter = Some(diameter);
        Ok(())
    }

    /// Aspect ratios available for the current width (empty if none selected).
    pub fn aspect_ratios(&self) -> &'static [&'static str] {
        self.width.map(|w| w.aspect_ratios).unwrap_or(&[])
    }

    /// Diameters available for the current width (empty if none selected).
    pub fn diameters(&self) -> &'static [&'static str] {
        self.width.map(|w| w.diameters).unwrap_or(&[])
    }

    pub fn width(&self) -> Option<&'static str> {
        self.width.map(|w| w.width)
    }

    pub fn aspect_ratio(&self) -> Option<&'static str> {
        self.aspect_ratio
    }

    pub fn diameter(&self) -> Option<&'static str> {
        self.diameter
    }

    /// True once all three dimensions are chosen.
    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.aspect_ratio.is_some() && self.diameter.is_some()
    }

    /// The conventional size label, e.g. `205/55 R16`.
    pub fn size_label(&self) -> Option<String> {
        match (self.width(), self.aspect_ratio, self.diameter) {
            (Some(w), Some(r), Some(d)) => Some(format!("{}/{} R{}", w, r, d)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_205_options() {
        let mut selection = TireSelection::default();
        selection.select_width("205").unwrap();

        assert_eq!(
            selection.aspect_ratios(),
            &["40", "45", "50", "55", "60", "65", "70", "75"]
        );
        assert_eq!(selection.diameters(), &["15", "16", "17", "18"]);
    }

    #[test]
    fn test_changing_width_clears_dependents() {
        let mut selection = TireSelection::default();
        selection.select_width("205").unwrap();
        selection.select_aspect_ratio("55").unwrap();
        selection.select_diameter("16").unwrap();
        assert!(selection.is_complete());

        selection.select_width("225").unwrap();
        assert_eq!(selection.width(), Some("225"));
        assert!(selection.aspect_ratio().is_none());
        assert!(selection.diameter().is_none());
        assert!(!selection.is_complete());
    }

    #[test]
    fn test_reselecting_same_width_clears_dependents() {
        let mut selection = TireSelection::default();
        selection.select_width("195").unwrap();
        selection.select_aspect_ratio("65").unwrap();

        selection.select_width("195").unwrap();
        assert!(selection.aspect_ratio().is_none());
    }

    #[test]
    fn test_rejects_unknown_width() {
        let mut selection = TireSelection::default();
        selection.select_width("205").unwrap();

        let err = selection.select_width("999").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedTireSize("999".to_string()));
        assert!(selection.width().is_none());
        assert!(selection.aspect_ratios().is_empty());
    }

    #[test]
    fn test_rejects_ratio_not_offered_for_width() {
        let mut selection = TireSelection::default();
        selection.select_width("155").unwrap();

        assert!(selection.select_aspect_ratio("40").is_err());
        assert!(selection.select_diameter("18").is_err());
        assert!(selection.select_aspect_ratio("65").is_ok());
    }

    #[test]
    fn test_ratio_without_width() {
        let mut selection = TireSelection::default();
        assert!(selection.select_aspect_ratio("55").is_err());
    }

    #[test]
    fn test_size_label() {
        let mut selection = TireSelection::default();
        assert!(selection.size_label().is_none());

        selection.select_width("235").unwrap();
        selection.select_aspect_ratio("45").unwrap();
        selection.select_diameter("18").unwrap();
        assert_eq!(selection.size_label().as_deref(), Some("235/45 R18"));
    }

    #[test]
    fn test_table_is_sorted_and_complete() {
        let widths: Vec<u32> = widths().map(|w| w.parse().unwrap()).collect();
        assert_eq!(widths.len(), 20);
        assert!(widths.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(TIRE_WIDTHS
            .iter()
            .all(|w| !w.aspect_ratios.is_empty() && !w.diameters.is_empty()));
    }
}
