//! Fixed TOC templates and prompt construction.
//!
//! The planning context is copied into prompts verbatim; it is authoritative
//! data and must never be paraphrased out of retrieval.

use crate::domain::report::planning::{PlanningContext, ReportTarget, TargetKind};
use crate::domain::report::section::RetrievedChunk;
use crate::domain::report::state::{ContentLength, ReportState};
use crate::domain::report::toc::{TableOfContents, TocSection, TocSource};

/// Builds the fixed fallback TOC for a report target.
///
/// Used when no memory pattern exists for the organization. Content differs
/// between consultant (discipline) and contractor (trade) procurement, and a
/// documentation section is added when a transmittal was issued.
pub fn fixed_toc(target: &ReportTarget, has_transmittal: bool) -> TableOfContents {
    let mut sections = match target.kind {
        TargetKind::Discipline => vec![
            TocSection::new("executive-summary", "Executive Summary", 1).with_description(
                format!(
                    "Purpose of the engagement, the {} services being procured, and the headline recommendation",
                    target.name
                ),
            ),
            TocSection::new("procurement-process", "Procurement Process", 1).with_description(
                "How proposals were invited, who was approached, and key dates".to_string(),
            ),
            TocSection::new("evaluation-criteria", "Evaluation Criteria & Methodology", 1)
                .with_description(
                    "Criteria, weightings, and the method used to score submissions".to_string(),
                ),
            TocSection::new("submission-assessment", "Submission Assessment", 1)
                .with_description(format!(
                    "Assessment of each {} submission against the criteria",
                    target.name
                )),
            TocSection::new("fee-comparison", "Fee Comparison", 1).with_description(
                "Comparison of proposed fees, exclusions, and commercial terms".to_string(),
            ),
            TocSection::new("recommendation", "Recommendation", 1).with_description(
                "Recommended consultant, rationale, and conditions of engagement".to_string(),
            ),
        ],
        TargetKind::Trade => vec![
            TocSection::new("executive-summary", "Executive Summary", 1).with_description(
                format!(
                    "Purpose of the tender, the {} works being procured, and the headline recommendation",
                    target.name
                ),
            ),
            TocSection::new("scope-of-works", "Scope of Works", 1).with_description(format!(
                "The {} scope tendered, key inclusions and exclusions",
                target.name
            )),
            TocSection::new("tender-process", "Tender Process", 1).with_description(
                "Tender invitation, addenda issued, and submission compliance".to_string(),
            ),
            TocSection::new("tender-evaluation", "Tender Evaluation", 1).with_description(
                "Evaluation of each tender against price and non-price criteria".to_string(),
            ),
            TocSection::new("price-comparison", "Price Comparison", 1).with_description(
                "Tendered prices, adjustments for scope gaps, and value assessment".to_string(),
            ),
            TocSection::new("recommendation", "Recommendation", 1).with_description(
                "Recommended tenderer, rationale, and award conditions".to_string(),
            ),
        ],
    };

    if has_transmittal {
        sections.push(
            TocSection::new("tender-documentation", "Tender Documentation", 1).with_description(
                "The documentation issued to tenderers, noting revisions current at tender close"
                    .to_string(),
            ),
        );
    }

    TableOfContents::new(sections, TocSource::Fixed)
}

/// System prompt for TOC generation.
pub fn toc_system_prompt() -> String {
    "You are a construction procurement specialist planning the structure of a tender \
     recommendation report. Respond with a JSON array only, no prose. Each element has \
     the shape {\"id\": string, \"title\": string, \"level\": 1 or 2, \"description\": string}."
        .to_string()
}

/// Builds the user prompt for generating a TOC from the project record.
pub fn toc_prompt(state: &ReportState) -> String {
    let mut prompt = format!(
        "Plan the table of contents for a tender recommendation report for {}.\n\n",
        state.target
    );
    if let Some(context) = &state.planning_context {
        prompt.push_str("## Project record\n");
        prompt.push_str(&format_planning_context(context));
        prompt.push('\n');
    }
    if state
        .transmittal
        .as_ref()
        .map(|t| t.has_documents())
        .unwrap_or(false)
    {
        prompt.push_str(
            "A document transmittal was issued to tenderers; include a section covering \
             the tender documentation.\n\n",
        );
    }
    prompt.push_str(
        "Return 5 to 8 sections. Use lowercase kebab-case ids. Respond with the JSON array only.\n",
    );
    prompt
}

/// System prompt for section drafting.
pub fn section_system_prompt() -> String {
    "You are a construction procurement specialist drafting sections of a tender \
     recommendation report. Write in clear, formal business prose. Ground every claim \
     in the provided project data and tender documents; never invent figures."
        .to_string()
}

/// Builds the user prompt for drafting one section.
pub fn section_prompt(
    state: &ReportState,
    section: &TocSection,
    chunks: &[RetrievedChunk],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Draft the \"{}\" section of a tender recommendation report for {}.\n\n",
        section.title, state.target
    ));

    if let Some(description) = &section.description {
        prompt.push_str(&format!("The section should cover: {}\n\n", description));
    }

    if let Some(context) = &state.planning_context {
        prompt.push_str("## Project record (authoritative; quote verbatim where relevant)\n");
        prompt.push_str(&format_planning_context(context));
        prompt.push('\n');
    }

    if !chunks.is_empty() {
        prompt.push_str("## Tender document extracts\n");
        for chunk in chunks {
            prompt.push_str(&format!("[{}] {}\n{}\n\n", chunk.id, chunk.document_name, chunk.content));
        }
    }

    if let Some(feedback) = &state.user_feedback {
        if let Some(instructions) = &feedback.instructions {
            prompt.push_str(&format!(
                "## Revision instructions from the reviewer\n{}\n\n",
                instructions
            ));
        }
    }

    if let Some(baseline) = &state.template_baseline {
        if state.content_length == ContentLength::Extended {
            prompt.push_str(&format!(
                "## Baseline text to expand upon\n{}\n\n",
                baseline
            ));
        }
    }

    prompt.push_str(&format!("Target length: {}.\n", length_directive(state.content_length)));
    prompt
}

fn length_directive(length: ContentLength) -> &'static str {
    match length {
        ContentLength::Brief => "two to three short paragraphs",
        ContentLength::Standard => "four to six paragraphs",
        ContentLength::Extended => "a detailed treatment of at least eight paragraphs",
    }
}

/// Formats the planning context for prompt injection.
fn format_planning_context(context: &PlanningContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("Project: {}\n", context.details.name));
    if let Some(address) = &context.details.address {
        out.push_str(&format!("Address: {}\n", address));
    }
    if let Some(jurisdiction) = &context.details.jurisdiction {
        out.push_str(&format!("Jurisdiction: {}\n", jurisdiction));
    }
    if !context.objectives.is_empty() {
        out.push_str("Objectives:\n");
        for objective in &context.objectives {
            out.push_str(&format!("- {}\n", objective.title));
        }
    }
    if !context.stages.is_empty() {
        out.push_str("Stages:\n");
        for stage in &context.stages {
            match (&stage.start, &stage.end) {
                (Some(start), Some(end)) => {
                    out.push_str(&format!("- {} ({} to {})\n", stage.name, start, end))
                }
                _ => out.push_str(&format!("- {}\n", stage.name)),
            }
        }
    }
    if !context.risks.is_empty() {
        out.push_str("Risks:\n");
        for risk in &context.risks {
            match &risk.rating {
                Some(rating) => out.push_str(&format!("- {} [{}]\n", risk.title, rating)),
                None => out.push_str(&format!("- {}\n", risk.title)),
            }
        }
    }
    if !context.stakeholders.is_empty() {
        out.push_str("Stakeholders:\n");
        for stakeholder in &context.stakeholders {
            match &stakeholder.category {
                Some(category) => {
                    out.push_str(&format!("- {} ({})\n", stakeholder.name, category))
                }
                None => out.push_str(&format!("- {}\n", stakeholder.name)),
            }
        }
    }
    out
}
