//! Static style tables, one per taxonomy.

use crate::taxonomy::{CapecAbstraction, CweAbstraction, Taxonomy};

use super::models::LabelClass;

/// Color, size and label class for one abstraction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleEntry {
    pub color: &'static str,
    pub size: u32,
    pub label_class: LabelClass,
}

/// Abstraction level -> style lookup with an explicit fallback entry.
#[derive(Debug)]
pub struct StyleTable<A: 'static> {
    pub entries: &'static [(A, StyleEntry)],
    /// Applied to unknown levels and to nodes without a record.
    pub fallback: StyleEntry,
}

impl<A: PartialEq> StyleTable<A> {
    /// Entry for a level, or the fallback when the table has none.
    pub fn lookup(&self, abstraction: &A) -> &StyleEntry {
        self.entries
            .iter()
            .find(|(level, _)| level == abstraction)
            .map(|(_, entry)| entry)
            .unwrap_or(&self.fallback)
    }
}

/// Fallback entry of a taxonomy's table.
pub fn fallback_style(taxonomy: Taxonomy) -> &'static StyleEntry {
    match taxonomy {
        Taxonomy::Cwe => &CWE_STYLES.fallback,
        Taxonomy::Capec => &CAPEC_STYLES.fallback,
    }
}

const fn entry(color: &'static str, size: u32, label_class: LabelClass) -> StyleEntry {
    StyleEntry {
        color,
        size,
        label_class,
    }
}

pub static CAPEC_STYLES: StyleTable<CapecAbstraction> = StyleTable {
    entries: &[
        (CapecAbstraction::Meta, entry("#2176ff", 30, LabelClass::Big)),
        (CapecAbstraction::Standard, entry("#75aaff", 18, LabelClass::Medium)),
        (CapecAbstraction::Detailed, entry("#94ebff", 10, LabelClass::Small)),
    ],
    fallback: entry("#ff0000", 10, LabelClass::Error),
};

pub static CWE_STYLES: StyleTable<CweAbstraction> = StyleTable {
    entries: &[
        (CweAbstraction::Pillar, entry("#db0054", 30, LabelClass::Big)),
        (CweAbstraction::Class, entry("#ff6200", 18, LabelClass::Medium)),
        (CweAbstraction::Base, entry("#ffbb00", 10, LabelClass::Small)),
        (CweAbstraction::Variant, entry("#e8e66b", 10, LabelClass::Small)),
        (CweAbstraction::Compound, entry("#9ac20c", 10, LabelClass::Small)),
    ],
    fallback: entry("#e5f7a6", 7, LabelClass::Small),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_levels() {
        assert_eq!(CAPEC_STYLES.lookup(&CapecAbstraction::Meta).color, "#2176ff");
        assert_eq!(CAPEC_STYLES.lookup(&CapecAbstraction::Standard).size, 18);
        assert_eq!(CWE_STYLES.lookup(&CweAbstraction::Compound).color, "#9ac20c");
        assert_eq!(
            CWE_STYLES.lookup(&CweAbstraction::Class).label_class,
            LabelClass::Medium
        );
    }

    #[test]
    fn test_lookup_falls_back() {
        assert_eq!(
            CAPEC_STYLES.lookup(&CapecAbstraction::from("meta")),
            &CAPEC_STYLES.fallback
        );
        assert_eq!(
            CWE_STYLES.lookup(&CweAbstraction::default()),
            &CWE_STYLES.fallback
        );
        assert_eq!(CAPEC_STYLES.fallback.label_class, LabelClass::Error);
        assert_eq!(fallback_style(Taxonomy::Cwe).color, "#e5f7a6");
    }

    #[test]
    fn test_every_known_level_has_an_entry() {
        for level in CweAbstraction::KNOWN {
            assert!(CWE_STYLES.entries.iter().any(|(l, _)| l == level), "{}", level);
            assert_ne!(CWE_STYLES.lookup(level), &CWE_STYLES.fallback, "{}", level);
        }
        for level in CapecAbstraction::KNOWN {
            assert!(CAPEC_STYLES.entries.iter().any(|(l, _)| l == level), "{}", level);
            assert_ne!(CAPEC_STYLES.lookup(level), &CAPEC_STYLES.fallback, "{}", level);
        }
        assert_eq!(CWE_STYLES.entries.len(), CweAbstraction::KNOWN.len());
        assert_eq!(CAPEC_STYLES.entries.len(), CapecAbstraction::KNOWN.len());
    }
}
