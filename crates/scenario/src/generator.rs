//! Fallback Scenario Generator
//!
//! Synthesizes a minimal 3-node chain for any category so the engine keeps
//! asking questions even when the authored scenario artifact is missing or
//! unparsable. The chain is intro -> basics -> advanced: a weak intro answer
//! drills into basics, a strong one jumps straight to advanced, and basics
//! plateaus into advanced either way.

use hirevox_core::{Node, Scenario, ScenarioPolicy};

/// Generate a 3-node fallback chain for `category`.
pub fn generate_fallback_scenario(category: &str) -> Scenario {
    let intro_id = format!("{category}_l1_intro");
    let basics_id = format!("{category}_l2_basics");
    let advanced_id = format!("{category}_l3_advanced");

    let nodes = vec![
        Node {
            id: intro_id.clone(),
            category: category.to_string(),
            order: 1,
            question: format!("Tell me about your hands-on experience with {category}."),
            weight: 1.0,
            success_criteria: vec![
                "experience".to_string(),
                "projects".to_string(),
                "skills".to_string(),
            ],
            followups: vec!["Which projects did you work on?".to_string()],
            next_if_fail: Some(basics_id.clone()),
            next_if_pass: Some(advanced_id.clone()),
        },
        Node {
            id: basics_id.clone(),
            category: category.to_string(),
            order: 2,
            question: format!("Walk me through the core concepts of {category}."),
            weight: 0.8,
            success_criteria: vec![
                "basics".to_string(),
                "concepts".to_string(),
                "principles".to_string(),
            ],
            followups: vec!["What matters most and why?".to_string()],
            next_if_fail: Some(advanced_id.clone()),
            next_if_pass: Some(advanced_id.clone()),
        },
        Node {
            id: advanced_id,
            category: category.to_string(),
            order: 3,
            question: format!("How did you approach the hardest problems you hit in {category}?"),
            weight: 0.9,
            success_criteria: vec![
                "complex tasks".to_string(),
                "solutions".to_string(),
                "optimization".to_string(),
            ],
            followups: vec!["Give me a concrete example.".to_string()],
            next_if_fail: None,
            next_if_pass: None,
        },
    ];

    Scenario {
        schema_version: "0.1".to_string(),
        policy: ScenarioPolicy::default(),
        nodes,
        start_id: intro_id,
    }
}
