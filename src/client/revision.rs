// src/client/revision.rs

use std::collections::HashSet;

use uuid::Uuid;

use super::{ClientError, KeyValueStore, QuestionClient, SubjectCache};
use crate::models::question::Question;

/// State of the revision view: the selected subject, its questions, and which
/// of them are expanded.
pub struct RevisionSession<S> {
    client: QuestionClient,
    cache: SubjectCache<S>,
    subject: Option<String>,
    questions: Vec<Question>,
    expanded: HashSet<Uuid>,
}

impl<S: KeyValueStore> RevisionSession<S> {
    pub fn new(client: QuestionClient, cache: SubjectCache<S>) -> Self {
        Self {
            client,
            cache,
            subject: None,
            questions: Vec::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cache(&self) -> &SubjectCache<S> {
        &self.cache
    }

    pub async fn subjects(&self) -> Result<Vec<String>, ClientError> {
        self.client.list_subjects().await
    }

    /// Switches to `subject`, serving it from the cache when possible.
    pub async fn select_subject(&mut self, subject: &str) -> Result<&[Question], ClientError> {
        self.load(subject, false).await
    }

    /// Loads `subject`. With `force_refresh` the cache is bypassed; the fetched
    /// list is cached either way. On failure the list is left empty.
    pub async fn load(&mut self, subject: &str, force_refresh: bool) -> Result<&[Question], ClientError> {
        self.subject = Some(subject.to_string());
        self.expanded.clear();

        if !force_refresh {
            if let Some(cached) = self.cache.get(subject) {
                tracing::debug!("Serving '{}' from cache ({} questions)", subject, cached.len());
                self.questions = cached;
                return Ok(&self.questions);
            }
        }

        match self.client.list_questions(Some(subject)).await {
            Ok(fetched) => {
                self.cache.put(subject, &fetched)?;
                self.questions = fetched;
                Ok(&self.questions)
            }
            Err(e) => {
                tracing::error!("Failed to fetch questions for '{}': {}", subject, e);
                self.questions.clear();
                Err(e)
            }
        }
    }

    /// Drops every cached subject and re-fetches the current one.
    pub async fn refresh(&mut self) -> Result<&[Question], ClientError> {
        let removed = self.cache.clear()?;
        tracing::debug!("Cleared {} cached subjects", removed);

        match self.subject.clone() {
            Some(subject) => self.load(&subject, true).await,
            None => Ok(&self.questions),
        }
    }

    /// Flips one question's expanded state. Returns whether it is now expanded.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.questions.iter().map(|q| q.id).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    /// Questions whose prompt or subject contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Question> {
        let term = term.to_lowercase();
        self.questions
            .iter()
            .filter(|q| {
                q.question.to_lowercase().contains(&term) || q.subject.to_lowercase().contains(&term)
            })
            .collect()
    }
}
