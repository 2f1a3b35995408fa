use std::collections::HashMap;

use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::constants::KECAMATAN_PACITAN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KecamatanSummary {
    pub name: &'static str,
    pub desa_count: i64,
    pub location_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DesaName {
    pub id: Uuid,
    pub name: String,
}

/// One summary per kecamatan, in the fixed order, with missing counts as zero.
/// Count keys are matched case-insensitively.
pub fn summarize(
    desa_counts: &[(String, i64)],
    location_counts: &[(String, i64)],
) -> Vec<KecamatanSummary> {
    let index = |counts: &[(String, i64)]| -> HashMap<String, i64> {
        counts
            .iter()
            .map(|(k, n)| (k.to_lowercase(), *n))
            .fold(HashMap::new(), |mut acc, (k, n)| {
                *acc.entry(k).or_insert(0) += n;
                acc
            })
    };
    let desa = index(desa_counts);
    let locations = index(location_counts);

    KECAMATAN_PACITAN
        .iter()
        .map(|&name| {
            let key = name.to_lowercase();
            KecamatanSummary {
                name,
                desa_count: desa.get(&key).copied().unwrap_or(0),
                location_count: locations.get(&key).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_fills_every_kecamatan() {
        let summary = summarize(
            &[("Punung".to_string(), 13), ("pacitan".to_string(), 2)],
            &[("Donorojo".to_string(), 4)],
        );
        assert_eq!(summary.len(), 12);
        assert_eq!(summary[0].name, "Arjosari");
        assert_eq!(summary[0].desa_count, 0);

        let punung = summary.iter().find(|k| k.name == "Punung").unwrap();
        assert_eq!(punung.desa_count, 13);
        let pacitan = summary.iter().find(|k| k.name == "Pacitan").unwrap();
        assert_eq!(pacitan.desa_count, 2);
        let donorojo = summary.iter().find(|k| k.name == "Donorojo").unwrap();
        assert_eq!(donorojo.location_count, 4);
    }
}
