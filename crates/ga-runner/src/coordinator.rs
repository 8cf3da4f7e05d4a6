use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};

use ga_core::{CoordinatorError, ModelRunOutcome, ReviewContext, ReviewError, ReviewResult};

use crate::agent::AgentFactory;
use crate::progress::{ModelState, NoopObserver, ProgressObserver};

pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Fans one review request out to several models and collects the results.
///
/// Every model gets its own task; a semaphore caps how many agent calls are
/// in flight. Results are written back by index, so the output order always
/// matches the input model list no matter which model finishes first. One
/// model failing (error, contract violation or panic) never affects the
/// others: its slot is simply `None`.
pub struct Coordinator {
    factory: Arc<dyn AgentFactory>,
    observer: Arc<dyn ProgressObserver>,
    max_workers: usize,
}

type TaskOutput = (usize, Result<ReviewResult, ReviewError>, Duration);

impl Coordinator {
    pub fn new(factory: Arc<dyn AgentFactory>) -> Self {
        Self {
            factory,
            observer: Arc::new(NoopObserver),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Number of concurrent agent calls for a run over `models` models.
    pub fn pool_size(&self, models: usize) -> usize {
        self.max_workers.min(models)
    }

    pub async fn run_all(
        &self,
        models: &[String],
        context: Arc<ReviewContext>,
        user_note: &str,
    ) -> Result<Vec<Option<ModelRunOutcome>>, CoordinatorError> {
        if models.is_empty() {
            return Err(CoordinatorError::NoModels);
        }
        let mut seen = HashSet::new();
        for model in models {
            if !seen.insert(model.as_str()) {
                return Err(CoordinatorError::DuplicateModel(model.clone()));
            }
        }

        for model in models {
            self.observer.on_state(model, &ModelState::Starting);
        }

        let pool = self.pool_size(models.len());
        info!(models = models.len(), pool, "starting review");

        let semaphore = Arc::new(Semaphore::new(pool));
        let user_note: Arc<str> = Arc::from(user_note);
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

        for (index, model) in models.iter().enumerate() {
            let semaphore = semaphore.clone();
            let factory = self.factory.clone();
            let observer = self.observer.clone();
            let context = context.clone();
            let user_note = user_note.clone();
            let model = model.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        let err = ReviewError::Task("worker pool closed".to_string());
                        return (index, Err(err), Duration::ZERO);
                    }
                };
                observer.on_state(&model, &ModelState::Running);

                let start = Instant::now();
                // Nested task: a panicking agent surfaces as a JoinError here
                // instead of losing the slot index.
                let run = tokio::spawn(run_model(factory, model, context, user_note));
                let result = match run.await {
                    Ok(result) => result,
                    Err(e) => Err(ReviewError::Task(e.to_string())),
                };
                (index, result, start.elapsed())
            });
        }

        let mut slots: Vec<Option<ModelRunOutcome>> = (0..models.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(result), duration)) => {
                    let model = &models[index];
                    info!(
                        model = %model,
                        status = %result.approval_status,
                        duration_secs = duration.as_secs_f64(),
                        "model completed"
                    );
                    self.observer.on_state(model, &ModelState::Done);
                    slots[index] = Some(ModelRunOutcome {
                        model: model.clone(),
                        result,
                        duration,
                    });
                }
                Ok((index, Err(e), _)) => {
                    let model = &models[index];
                    error!(model = %model, "Model {model} failed: {e}");
                    self.observer.on_state(model, &ModelState::Failed(e.to_string()));
                }
                Err(e) => {
                    // Only reachable if the observer itself panicked; the
                    // affected slot stays empty.
                    error!("review task aborted: {e}");
                }
            }
        }

        Ok(slots)
    }
}

async fn run_model(
    factory: Arc<dyn AgentFactory>,
    model: String,
    context: Arc<ReviewContext>,
    user_note: Arc<str>,
) -> Result<ReviewResult, ReviewError> {
    let agent = factory.build(&model)?;
    let result = agent.review(&context, &user_note).await?;
    result.validate()?;
    Ok(result)
}
