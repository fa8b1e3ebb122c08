//! SyncQuestionHandler - Attaches a newly created question to every
//! questionnaire that can see its pillar.

use std::sync::Arc;

use tracing::info;

use crate::domain::assignment::AssignmentError;
use crate::domain::catalog::plan_question_set;
use crate::domain::foundation::QuestionId;
use crate::ports::{CatalogReader, QuestionnaireRepository};

#[derive(Debug, Clone)]
pub struct SyncQuestionCommand {
    pub question_id: QuestionId,
}

pub struct SyncQuestionHandler {
    catalog: Arc<dyn CatalogReader>,
    questionnaires: Arc<dyn QuestionnaireRepository>,
}

impl SyncQuestionHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>, questionnaires: Arc<dyn QuestionnaireRepository>) -> Self {
        Self {
            catalog,
            questionnaires,
        }
    }

    /// Returns how many questionnaires gained the question.
    ///
    /// Company pillars reach that company's questionnaires; global pillars
    /// reach every questionnaire.
    pub async fn handle(&self, cmd: SyncQuestionCommand) -> Result<usize, AssignmentError> {
        let question = self
            .catalog
            .find_question(cmd.question_id)
            .await?
            .ok_or_else(|| AssignmentError::validation(format!("question {} does not exist", cmd.question_id)))?;
        let pillar = self
            .catalog
            .find_pillar(question.pillar_id)
            .await?
            .ok_or(AssignmentError::PillarNotFound(question.pillar_id))?;

        let mut attached = 0;
        for questionnaire in self.questionnaires.list(pillar.company_id).await? {
            let existing = self.questionnaires.question_links(questionnaire.id).await?;
            let changes = plan_question_set(questionnaire.id, &existing, &[question.id], false);
            if changes.is_empty() {
                continue;
            }
            self.questionnaires
                .apply_question_changes(questionnaire.id, &changes)
                .await?;
            attached += 1;
        }

        info!(question_id = %question.id, questionnaires = attached, "question synced");
        Ok(attached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::*;

    async fn ids(store: &crate::adapters::memory::InMemorySurveyStore, q: crate::domain::foundation::QuestionnaireId) -> Vec<i64> {
        store
            .question_links(q)
            .await
            .unwrap()
            .iter()
            .map(|l| l.question_id.get())
            .collect()
    }

    #[tokio::test]
    async fn company_question_reaches_only_that_company() {
        let store = seeded_store().await;
        let acme = publish_questionnaire(&store, ACME, &[11]).await;
        let globex = publish_questionnaire(&store, GLOBEX, &[11]).await;

        let count = SyncQuestionHandler::new(store.clone(), store.clone())
            .handle(SyncQuestionCommand {
                question_id: QuestionId::new(21),
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(ids(&store, acme.id).await, vec![11, 21]);
        assert_eq!(ids(&store, globex.id).await, vec![11]);
    }

    #[tokio::test]
    async fn global_question_reaches_every_questionnaire_once() {
        let store = seeded_store().await;
        let acme = publish_questionnaire(&store, ACME, &[21]).await;
        let globex = publish_questionnaire(&store, GLOBEX, &[12]).await;

        let count = SyncQuestionHandler::new(store.clone(), store.clone())
            .handle(SyncQuestionCommand {
                question_id: QuestionId::new(12),
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(ids(&store, acme.id).await, vec![21, 12]);
        assert_eq!(ids(&store, globex.id).await, vec![12]);
    }

    #[tokio::test]
    async fn unknown_question_is_rejected() {
        let store = seeded_store().await;

        let result = SyncQuestionHandler::new(store.clone(), store.clone())
            .handle(SyncQuestionCommand {
                question_id: QuestionId::new(999),
            })
            .await;

        assert!(matches!(result, Err(AssignmentError::Validation { .. })));
    }
}
