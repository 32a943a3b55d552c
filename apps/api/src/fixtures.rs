//! Dummy candidate data for trying the service without filling the form.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::candidate::CandidateProfile;

const FIRST_NAMES: &[&str] = &["Aditi", "Karan", "Meera", "Rohan", "Priya", "Saubhagya"];
const LAST_NAMES: &[&str] = &["Sharma", "Patel", "Mishra", "Kumar", "Singh", "Das"];
const LOCATIONS: &[&str] = &[
    "Bengaluru, India",
    "Mumbai, India",
    "Pune, India",
    "Delhi, India",
];
const TECH_POOLS: &[&[&str]] = &[
    &["Python", "Django", "PostgreSQL"],
    &["React", "TypeScript", "Node.js"],
    &["Java", "Spring Boot", "MySQL"],
    &["Python", "Pandas", "scikit-learn"],
    &["AWS", "Terraform", "Docker"],
];

pub fn generate_dummy_candidate() -> CandidateProfile {
    generate_dummy_candidate_with(&mut rand::thread_rng())
}

pub fn generate_dummy_candidate_with<R: Rng + ?Sized>(rng: &mut R) -> CandidateProfile {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Aditi");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Sharma");
    let full_name = format!("{first} {last}");
    let years: f64 = rng.gen_range(0.5..=8.0);
    let stack = TECH_POOLS.choose(rng).copied().unwrap_or(TECH_POOLS[0]);

    CandidateProfile {
        email: format!("{}@example.com", full_name.replace(' ', ".").to_lowercase()),
        full_name,
        phone: format!("+91{}", rng.gen_range(9_000_000_000u64..=9_999_999_999)),
        years_experience: (years * 10.0).round() / 10.0,
        desired_positions: vec!["Software Engineer".to_string()],
        location: LOCATIONS.choose(rng).copied().unwrap_or(LOCATIONS[0]).to_string(),
        tech_stack: stack.iter().map(|s| s.to_string()).collect(),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_dummy_candidate_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let c = generate_dummy_candidate_with(&mut rng);

            let expected_email = format!("{}@example.com", c.full_name.replace(' ', ".").to_lowercase());
            assert_eq!(c.email, expected_email);
            assert!(c.phone.starts_with("+919"));
            assert_eq!(c.phone.len(), 13);
            assert!((0.5..=8.0).contains(&c.years_experience));
            assert_eq!(c.years_experience, (c.years_experience * 10.0).round() / 10.0);
            assert_eq!(c.desired_positions, vec!["Software Engineer"]);
            assert!(LOCATIONS.contains(&c.location.as_str()));
            assert_eq!(c.tech_stack.len(), 3);
        }
    }

    #[test]
    fn test_same_seed_same_candidate() {
        let a = generate_dummy_candidate_with(&mut StdRng::seed_from_u64(42));
        let b = generate_dummy_candidate_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.full_name, b.full_name);
        assert_eq!(a.tech_stack, b.tech_stack);
    }
}
