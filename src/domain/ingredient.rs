use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{KeepsakeError, Result};

/// A craftable item. Base ingredients have an empty `mix`; composites name
/// exactly two other ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub mix: Vec<String>,
    /// On-chain object id, set once minted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Ingredient {
    pub fn base(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mix: Vec::new(),
            address: None,
        }
    }

    pub fn composite(name: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mix: vec![a.into(), b.into()],
            address: None,
        }
    }

    pub fn is_base(&self) -> bool {
        self.mix.is_empty()
    }

    pub fn is_minted(&self) -> bool {
        self.address.is_some()
    }
}

/// Order ingredients so each one follows everything in its `mix`.
///
/// Kahn's algorithm, always emitting the ready ingredient with the lowest
/// input position, so an input that is already ordered comes back unchanged.
/// Duplicate names resolve to their first occurrence.
pub fn sort_ingredients(ingredients: Vec<Ingredient>) -> Result<Vec<Ingredient>> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(ingredients.len());
    for (i, ingredient) in ingredients.iter().enumerate() {
        index.entry(ingredient.name.as_str()).or_insert(i);
    }

    let mut pending = vec![0usize; ingredients.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); ingredients.len()];

    for (i, ingredient) in ingredients.iter().enumerate() {
        if !(ingredient.mix.is_empty() || ingredient.mix.len() == 2) {
            return Err(KeepsakeError::InvalidMix {
                name: ingredient.name.clone(),
                found: ingredient.mix.len(),
            });
        }
        for dep in &ingredient.mix {
            let &d = index
                .get(dep.as_str())
                .ok_or_else(|| KeepsakeError::UnknownIngredient {
                    ingredient: ingredient.name.clone(),
                    missing: dep.clone(),
                })?;
            pending[i] += 1;
            dependents[d].push(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..ingredients.len())
        .filter(|&i| pending[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(ingredients.len());

    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &next in &dependents[i] {
            pending[next] -= 1;
            if pending[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() < ingredients.len() {
        let stuck: Vec<&str> = ingredients
            .iter()
            .enumerate()
            .filter(|(i, _)| pending[*i] > 0)
            .map(|(_, ingredient)| ingredient.name.as_str())
            .collect();
        return Err(KeepsakeError::DependencyCycle(stuck.join(", ")));
    }

    let mut slots: Vec<Option<Ingredient>> = ingredients.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ingredients: &[Ingredient]) -> Vec<&str> {
        ingredients.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_composite_moves_after_components() {
        let sorted = sort_ingredients(vec![
            Ingredient::composite("steam", "water", "fire"),
            Ingredient::base("water"),
            Ingredient::base("fire"),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["water", "fire", "steam"]);
    }

    #[test]
    fn test_ordered_input_is_untouched() {
        let input = vec![
            Ingredient::base("earth"),
            Ingredient::base("water"),
            Ingredient::composite("mud", "earth", "water"),
            Ingredient::base("fire"),
            Ingredient::composite("brick", "mud", "fire"),
        ];
        let sorted = sort_ingredients(input.clone()).unwrap();
        assert_eq!(sorted, input);
    }

    #[test]
    fn test_address_survives_sorting() {
        let mut water = Ingredient::base("water");
        water.address = Some("0xw".to_string());
        let sorted = sort_ingredients(vec![
            Ingredient::composite("ice", "water", "water"),
            water,
        ])
        .unwrap();
        assert_eq!(sorted[0].address.as_deref(), Some("0xw"));
        assert_eq!(sorted[1].name, "ice");
    }

    #[test]
    fn test_unknown_dependency() {
        let err = sort_ingredients(vec![Ingredient::composite("steam", "water", "fire")]).unwrap_err();
        match err {
            KeepsakeError::UnknownIngredient { ingredient, missing } => {
                assert_eq!(ingredient, "steam");
                assert_eq!(missing, "water");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let err = sort_ingredients(vec![
            Ingredient::base("fire"),
            Ingredient::composite("ouroboros", "ouroboros", "fire"),
        ])
        .unwrap_err();
        assert!(matches!(err, KeepsakeError::DependencyCycle(ref s) if s == "ouroboros"));
    }

    #[test]
    fn test_single_element_mix_rejected() {
        let err = sort_ingredients(vec![Ingredient {
            name: "odd".to_string(),
            mix: vec!["x".to_string()],
            address: None,
        }])
        .unwrap_err();
        assert!(matches!(err, KeepsakeError::InvalidMix { found: 1, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_ingredients(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_serde_omits_missing_address() {
        let json = serde_json::to_string(&Ingredient::base("air")).unwrap();
        assert_eq!(json, r#"{"name":"air","mix":[]}"#);

        let parsed: Ingredient = serde_json::from_str(r#"{"name":"air"}"#).unwrap();
        assert!(parsed.is_base());
        assert!(!parsed.is_minted());
    }
}
