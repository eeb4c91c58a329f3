// Evolution chain flattening.
// Turns a chain tree into parent-to-child pairs.

use std::collections::HashSet;

use tracing::warn;

use crate::api::{ChainLink, EvolutionChain, EvolutionPair};

/// Every pre-evolution to evolution edge of `chain`.
///
/// Each node emits one pair per child in source order before its children
/// are expanded, so `A -> [B, C], B -> [D]` yields `(A,B), (A,C), (B,D)`.
/// Uses an explicit stack; a species met a second time is not expanded
/// again. A chain without a root yields no pairs.
pub fn flatten(chain: &EvolutionChain) -> Vec<EvolutionPair> {
    let Some(root) = chain.chain.as_ref() else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    let mut visited: HashSet<&str> = HashSet::from([root.species.name.as_str()]);
    let mut stack: Vec<&ChainLink> = vec![root];

    while let Some(node) = stack.pop() {
        for child in &node.evolves_to {
            pairs.push(EvolutionPair {
                pre_evolution: node.species.clone(),
                evolution: child.species.clone(),
            });
        }

        let mut fresh = Vec::with_capacity(node.evolves_to.len());
        for child in &node.evolves_to {
            if visited.insert(child.species.name.as_str()) {
                fresh.push(child);
            } else {
                warn!(
                    species = %child.species.name,
                    chain = ?chain.id,
                    "Species repeats within evolution chain, not expanding it again"
                );
            }
        }
        // Reversed so the first child is expanded first.
        stack.extend(fresh.into_iter().rev());
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResourceRef;

    fn node(name: &str, children: Vec<ChainLink>) -> ChainLink {
        ChainLink::new(
            ResourceRef::new(name, format!("http://api/pokemon-species/{}/", name)),
            children,
        )
    }

    fn chain(root: ChainLink) -> EvolutionChain {
        EvolutionChain {
            id: Some(1),
            chain: Some(root),
        }
    }

    fn names(pairs: &[EvolutionPair]) -> Vec<(&str, &str)> {
        pairs
            .iter()
            .map(|p| (p.pre_evolution.name.as_str(), p.evolution.name.as_str()))
            .collect()
    }

    #[test]
    fn test_branching_chain() {
        let tree = chain(node(
            "A",
            vec![node("B", vec![node("D", vec![])]), node("C", vec![])],
        ));

        let pairs = flatten(&tree);

        assert_eq!(names(&pairs), vec![("A", "B"), ("A", "C"), ("B", "D")]);
    }

    #[test]
    fn test_linear_chain() {
        let tree = chain(node(
            "bulbasaur",
            vec![node("ivysaur", vec![node("venusaur", vec![])])],
        ));

        assert_eq!(
            names(&flatten(&tree)),
            vec![("bulbasaur", "ivysaur"), ("ivysaur", "venusaur")]
        );
    }

    #[test]
    fn test_multi_way_branch_shares_pre_evolution() {
        let tree = chain(node(
            "eevee",
            vec![
                node("vaporeon", vec![]),
                node("jolteon", vec![]),
                node("flareon", vec![]),
            ],
        ));

        let pairs = flatten(&tree);

        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.pre_evolution.name == "eevee"));
        assert!(pairs.iter().all(|p| p.evolution.name != "eevee"));
    }

    #[test]
    fn test_single_node_and_empty_chain() {
        assert!(flatten(&chain(node("tauros", vec![]))).is_empty());
        assert!(flatten(&EvolutionChain::default()).is_empty());
    }

    #[test]
    fn test_repeated_species_is_not_expanded_twice() {
        let tree = chain(node(
            "A",
            vec![
                node("B", vec![node("X", vec![])]),
                node("B", vec![node("Y", vec![])]),
            ],
        ));

        let pairs = flatten(&tree);

        assert_eq!(names(&pairs), vec![("A", "B"), ("A", "B"), ("B", "X")]);
    }
}
