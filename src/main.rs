//! Demo runner: generates one tender recommendation report end to end with
//! seeded in-process adapters, auto-approving both interrupts.
//!
//! Set `ASSEMBLE_REPORTS__AI__PROVIDER=mock` (the .env default for local use)
//! to run without an API key.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use assemble_reports::adapters::ai::{AnthropicConfig, AnthropicProvider, MockAIProvider};
use assemble_reports::adapters::memory::InMemoryTocMemory;
use assemble_reports::adapters::planning::InMemoryPlanningSource;
use assemble_reports::adapters::retrieval::InMemoryRetriever;
use assemble_reports::adapters::storage::InMemoryReportStore;
use assemble_reports::config::{AiProviderKind, AppConfig};
use assemble_reports::domain::foundation::{OrganizationId, ProjectId, StakeholderId, UserId};
use assemble_reports::domain::report::workflow::{
    InterruptHandler, ReportWorkflow, WorkflowError, WorkflowNodes,
};
use assemble_reports::domain::report::{
    Objective, PlanningContext, ProjectDetails, ReportState, ReportTarget,
    SectionFeedbackResponse, TocApprovalResponse, TransmittalContext, TransmittalDocument,
    WorkflowInterrupt,
};
use assemble_reports::ports::AIProvider;

/// Accepts every TOC and section as proposed.
struct AutoApprove;

#[async_trait]
impl InterruptHandler for AutoApprove {
    async fn on_toc_approval(
        &self,
        interrupt: WorkflowInterrupt,
    ) -> Result<TocApprovalResponse, WorkflowError> {
        match interrupt {
            WorkflowInterrupt::TocApproval { toc, message } => {
                info!(sections = toc.len(), "{}", message);
                Ok(TocApprovalResponse { approved_toc: toc })
            }
            other => Err(WorkflowError::Interrupt(format!(
                "unexpected interrupt: {:?}",
                other
            ))),
        }
    }

    async fn on_section_feedback(
        &self,
        interrupt: WorkflowInterrupt,
    ) -> Result<SectionFeedbackResponse, WorkflowError> {
        if let WorkflowInterrupt::SectionFeedback { section, .. } = &interrupt {
            info!(
                section = %section.id,
                words = section.word_count(),
                "section drafted, approving"
            );
        }
        Ok(SectionFeedbackResponse::approve())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let ai: Arc<dyn AIProvider> = match config.ai.provider {
        AiProviderKind::Anthropic => {
            let key = config.ai.anthropic_api_key.clone().unwrap_or_default();
            Arc::new(AnthropicProvider::new(
                AnthropicConfig::new(key)
                    .with_model(config.ai.model.clone())
                    .with_timeout(config.ai.timeout())
                    .with_max_retries(config.ai.max_retries),
            )?)
        }
        AiProviderKind::Mock => Arc::new(MockAIProvider::new()),
    };

    let project_id = ProjectId::new();
    let stakeholder_id = StakeholderId::new();

    let planning = InMemoryPlanningSource::new()
        .with_context(
            project_id,
            PlanningContext {
                details: ProjectDetails {
                    project_id: Some(project_id),
                    name: "Collins Street Tower".to_string(),
                    address: Some("100 Collins Street, Melbourne".to_string()),
                    description: Some("32-storey commercial office development".to_string()),
                    jurisdiction: Some("City of Melbourne".to_string()),
                },
                objectives: vec![
                    Objective {
                        title: "Achieve practical completion by Q4 2027".to_string(),
                        description: None,
                    },
                    Objective {
                        title: "Deliver 5-star Green Star rating".to_string(),
                        description: None,
                    },
                ],
                ..PlanningContext::default()
            },
        )
        .with_transmittal(
            project_id,
            stakeholder_id,
            TransmittalContext::new(vec![
                TransmittalDocument {
                    name: "Structural Drawings".to_string(),
                    version: "Rev C".to_string(),
                    category: "Drawings".to_string(),
                },
                TransmittalDocument {
                    name: "Concrete Specification".to_string(),
                    version: "Rev B".to_string(),
                    category: "Specifications".to_string(),
                },
            ]),
        )
        .with_stakeholder_name(stakeholder_id, "Acme Concrete Pty Ltd");

    let retriever = InMemoryRetriever::new(config.report.retrieval_top_k)
        .with_chunk(
            "chunk-1",
            "Acme Concrete Tender.pdf",
            "Acme Concrete submits a lump sum price of $14.2m for the concrete works \
             package including formwork, reinforcement and pumping",
            vec!["tenders".to_string()],
        )
        .with_chunk(
            "chunk-2",
            "BuildCo Tender.pdf",
            "BuildCo tenders $15.1m for the concrete works with exclusions for \
             dewatering and weekend pours",
            vec!["tenders".to_string()],
        )
        .with_chunk(
            "chunk-3",
            "Tender Evaluation Matrix.xlsx",
            "Evaluation criteria: price 50%, programme 20%, methodology 15%, \
             experience and references 15%",
            vec!["tenders".to_string()],
        );

    let store = Arc::new(InMemoryReportStore::new());
    let nodes = WorkflowNodes::new(
        Arc::new(planning),
        Arc::new(InMemoryTocMemory::new()),
        Arc::new(retriever),
        ai,
        store.clone(),
    );

    let state = ReportState::new(
        project_id,
        OrganizationId::new(),
        "Tender Recommendation - Concrete Works",
        ReportTarget::trade("Concrete Works"),
    )
    .with_document_sets(vec!["tenders".to_string()])
    .with_stakeholder(stakeholder_id);

    let mut state = state;
    state.claim_lock(UserId::new("demo-user")?, "Demo User");

    let workflow = ReportWorkflow::new(nodes);
    let finished = workflow.run(state, &AutoApprove).await?;

    let summary = finished.summary();
    info!(
        title = %summary.title,
        sections = summary.completed_sections,
        words = summary.word_count,
        sources = summary.unique_sources,
        transmittal_documents = summary.transmittal_document_count,
        "report complete"
    );
    for section in &finished.sections {
        println!("\n## {}\n\n{}", section.title, section.content);
    }

    Ok(())
}
