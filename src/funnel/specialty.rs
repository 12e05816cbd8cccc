//! Specialty presets: average hours needed to finish one treatment.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specialty {
    pub id: &'static str,
    pub name: &'static str,
    pub avg_hours: f64,
}

pub const SPECIALTIES: &[Specialty] = &[
    Specialty { id: "faceta", name: "Faceta/Lente", avg_hours: 8.0 },
    Specialty { id: "implante", name: "Implante", avg_hours: 4.0 },
    Specialty { id: "ortodontia", name: "Ortodontia", avg_hours: 2.0 },
    Specialty { id: "clinico", name: "Clínico Geral", avg_hours: 1.0 },
    Specialty { id: "endodontia", name: "Endodontia", avg_hours: 2.0 },
    Specialty { id: "periodontia", name: "Periodontia", avg_hours: 3.0 },
    Specialty { id: "protese", name: "Prótese", avg_hours: 6.0 },
    Specialty { id: "cirurgia", name: "Cirurgia", avg_hours: 3.0 },
];

pub fn specialty(id: &str) -> Option<&'static Specialty> {
    SPECIALTIES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(specialty("implante").unwrap().avg_hours, 4.0);
        assert!(specialty("cardiologia").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in SPECIALTIES.iter().enumerate() {
            assert!(SPECIALTIES[i + 1..].iter().all(|b| b.id != a.id));
        }
    }
}
