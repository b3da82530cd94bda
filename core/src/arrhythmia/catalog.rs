use rand::Rng;

use crate::arrhythmia::spec::ArrhythmiaSpec;
use crate::prelude::{EkgError, EkgResult};

/// One named rhythm in the training catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub spec: ArrhythmiaSpec,
}

/// Registry of the rhythms a drill can present. Declaration order is stable
/// so seeded selection reproduces across runs.
#[derive(Debug, Clone)]
pub struct ArrhythmiaCatalog {
    entries: Vec<CatalogEntry>,
}

impl ArrhythmiaCatalog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &str, spec: ArrhythmiaSpec) {
        self.entries.push(CatalogEntry {
            name: name.to_string(),
            spec,
        });
    }

    pub fn lookup(&self, name: &str) -> EkgResult<&ArrhythmiaSpec> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.spec)
            .ok_or_else(|| EkgError::UnknownArrhythmia(name.to_string()))
    }

    /// Registered names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Uniformly random entry, or `None` on an empty catalog.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&CatalogEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.entries.len());
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The six rhythms of the legacy trainer, rates in beats per minute.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.register(
            "Sinus Tachycardia",
            ArrhythmiaSpec {
                heart_rate: 100.0,
                description: "Sinus tachycardia is characterized by a regular rhythm with a \
                              P wave preceding every QRS complex. The heart rate is typically \
                              above 100 bpm."
                    .into(),
                ..Default::default()
            },
        );
        catalog.register(
            "Afib with RVR",
            ArrhythmiaSpec {
                heart_rate: 150.0,
                has_p_wave: false,
                rr_interval_variable: true,
                description: "Atrial fibrillation with rapid ventricular response lacks \
                              distinct P waves, and the R-R interval varies irregularly due \
                              to uncoordinated atrial activity."
                    .into(),
                ..Default::default()
            },
        );
        catalog.register(
            "Aflutter",
            ArrhythmiaSpec {
                heart_rate: 150.0,
                has_p_wave: false,
                flutter_ratio: Some(2),
                description: "Atrial flutter has a characteristic 'sawtooth' pattern due to \
                              rapid atrial flutter waves, with a consistent R-R interval and \
                              a ventricular rate around 150 bpm."
                    .into(),
                ..Default::default()
            },
        );
        catalog.register(
            "AVRT",
            ArrhythmiaSpec {
                heart_rate: 220.0,
                p_wave_inverted: true,
                p_wave_retrograde: true,
                rr_interval_variable: true,
                description: "Atrioventricular reentrant tachycardia shows a very fast \
                              ventricular rate (200-300 bpm), with retrograde P waves and \
                              some variability in R wave amplitude."
                    .into(),
                ..Default::default()
            },
        );
        catalog.register(
            "AVNRT",
            ArrhythmiaSpec {
                heart_rate: 180.0,
                has_p_wave: false,
                description: "Atrioventricular nodal reentrant tachycardia has a fast rate \
                              of 140-280 bpm, with a short PR interval and often overlapping \
                              P and QRS waves."
                    .into(),
                ..Default::default()
            },
        );
        catalog.register(
            "Multifocal Atrial Tachycardia",
            ArrhythmiaSpec {
                heart_rate: 100.0,
                rr_interval_variable: true,
                description: "Multifocal atrial tachycardia features P waves with at least 3 \
                              different morphologies and variable P-P, P-R, and R-R \
                              intervals, with some P waves not followed by QRS complexes."
                    .into(),
                ..Default::default()
            },
        );
        catalog
    }
}

impl Default for ArrhythmiaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn standard_catalog_registers_six_rhythms() {
        let catalog = ArrhythmiaCatalog::standard();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.names()[0], "Sinus Tachycardia");
        assert_eq!(catalog.names()[5], "Multifocal Atrial Tachycardia");
    }

    #[test]
    fn lookup_returns_registered_spec() {
        let catalog = ArrhythmiaCatalog::standard();
        let spec = catalog.lookup("Aflutter").unwrap();
        assert_eq!(spec.heart_rate, 150.0);
        assert_eq!(spec.flutter_ratio, Some(2));
        assert!(!spec.has_p_wave);
    }

    #[test]
    fn lookup_unknown_name_fails() {
        let catalog = ArrhythmiaCatalog::standard();
        let err = catalog.lookup("Ventricular Samba").unwrap_err();
        assert!(matches!(err, EkgError::UnknownArrhythmia(_)));
        assert!(err.to_string().contains("Ventricular Samba"));
    }

    #[test]
    fn every_entry_has_positive_rate_and_description() {
        let catalog = ArrhythmiaCatalog::standard();
        for name in catalog.names() {
            let spec = catalog.lookup(name).unwrap();
            assert!(spec.heart_rate > 0.0, "{} has a non-positive rate", name);
            assert!(!spec.description.is_empty(), "{} lacks a description", name);
        }
    }

    #[test]
    fn seeded_pick_is_reproducible() {
        let catalog = ArrhythmiaCatalog::standard();
        let mut first = StdRng::seed_from_u64(11);
        let mut second = StdRng::seed_from_u64(11);
        for _ in 0..8 {
            let a = catalog.pick(&mut first).unwrap().name.clone();
            let b = catalog.pick(&mut second).unwrap().name.clone();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn pick_on_empty_catalog_is_none() {
        let catalog = ArrhythmiaCatalog::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(catalog.pick(&mut rng).is_none());
    }
}
