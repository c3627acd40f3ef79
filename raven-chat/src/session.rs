//! Session orchestration.
//!
//! A [`ChatSession`] owns the expensive pieces (embedding model, vector
//! index, generation client) and exposes the `ask`/`ask_stream` contract.
//! Construction is cheap; the first question (or an explicit
//! [`initialize`](ChatSession::initialize)) pays the startup cost.
//!
//! The lifecycle is an explicit state machine:
//!
//! ```text
//! Uninitialized ── initialize ──▶ Initializing ──▶ Ready
//!                                      │               │ initialize(force)
//!                                      ▼               ▼
//!                                Uninitialized     Rebuilding ──▶ Ready
//! ```
//!
//! Transitions are serialized by an async mutex. Queries snapshot the
//! current `Ready` handle, so traffic racing a rebuild keeps the previous
//! complete index until the replacement is published in one swap.

use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use tokio::sync::{oneshot, Mutex, RwLock};
use tracing::{info, warn};

use raven_core::{Llm, Prompt};
use raven_model::build_llm;
use raven_rag::{
    DocumentLoader, EmbeddingProvider, FastembedProvider, RagPipeline, RecursiveChunker,
    Retriever, SnapshotVectorStore,
};

use crate::config::AppConfig;
use crate::error::{ChatError, Result};
use crate::generation::{strip_reasoning, AnswerStream, GenerationClient};
use crate::prompt::PromptTemplate;

/// The initialized, shareable core of a session.
///
/// Everything in here is read-only after construction and safe for
/// concurrent use.
pub struct Engine {
    retriever: Retriever,
    generation: GenerationClient,
    template: PromptTemplate,
}

impl Engine {
    /// Retrieve context for a question and assemble the model-ready prompt.
    async fn assemble(&self, question: &str) -> Result<Prompt> {
        let results = self.retriever.retrieve(question).await?;
        let context = Retriever::format_context(&results);
        Ok(self.template.assemble(&context, question))
    }
}

/// Lifecycle states of a [`ChatSession`].
#[derive(Clone)]
pub enum SessionState {
    /// Nothing constructed yet; the first query triggers initialization.
    Uninitialized,
    /// First-time construction in progress.
    Initializing,
    /// Fully constructed and serving queries.
    Ready(Arc<Engine>),
    /// A rebuild is in progress; queries use the retained previous engine.
    Rebuilding(Arc<Engine>),
}

impl SessionState {
    /// Short state name for health reporting and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready(_) => "ready",
            Self::Rebuilding(_) => "rebuilding",
        }
    }
}

/// The session orchestrator.
///
/// One instance is constructed at process start and shared (by `Arc`) with
/// every front end; its components are built lazily and reused across all
/// queries.
///
/// # Example
///
/// ```rust,ignore
/// use raven_chat::{AppConfig, ChatSession};
///
/// let session = ChatSession::new(AppConfig::default());
/// let answer = session.ask("what's your favorite day of the year?").await?;
/// ```
pub struct ChatSession {
    config: AppConfig,
    state: RwLock<SessionState>,
    /// Serializes Uninitialized/Initializing/Rebuilding transitions.
    init_lock: Mutex<()>,
    embedding_override: Option<Arc<dyn EmbeddingProvider>>,
    llm_override: Option<Arc<dyn Llm>>,
}

impl ChatSession {
    /// Create an uninitialized session with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: RwLock::new(SessionState::Uninitialized),
            init_lock: Mutex::new(()),
            embedding_override: None,
            llm_override: None,
        }
    }

    /// Create a builder to inject pre-built components (offline embedding
    /// provider, scripted model) instead of constructing them from config.
    pub fn builder(config: AppConfig) -> ChatSessionBuilder {
        ChatSessionBuilder { session: Self::new(config) }
    }

    /// The configuration this session runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current lifecycle state name.
    pub fn state_name(&self) -> &'static str {
        // try_read only contends with the brief state-publish writes.
        match self.state.try_read() {
            Ok(state) => state.name(),
            Err(_) => "initializing",
        }
    }

    /// The active model identifier, once initialized.
    pub async fn model_name(&self) -> Option<String> {
        self.current_engine().await.map(|e| e.generation.model_name().to_string())
    }

    /// Number of entries in the live index, once initialized.
    pub async fn index_len(&self) -> Option<usize> {
        let engine = self.current_engine().await?;
        engine.retriever.pipeline().index_len().await.ok()
    }

    /// Initialize or re-initialize the session.
    ///
    /// With `force_rebuild == false` this is an idempotent no-op once the
    /// session is `Ready`. With `force_rebuild == true` the vector index is
    /// rebuilt from the source documents and swapped in atomically; the
    /// embedding model and generation client are reused.
    ///
    /// # Errors
    ///
    /// Returns a domain error when no source documents are available for a
    /// required build. A failed first initialization leaves the session
    /// `Uninitialized`; a failed rebuild restores the previous engine.
    pub async fn initialize(&self, force_rebuild: bool) -> Result<()> {
        let _guard = self.init_lock.lock().await;

        let previous = self.state.read().await.clone();
        let previous_engine = match &previous {
            SessionState::Ready(engine) => {
                if !force_rebuild {
                    return Ok(());
                }
                Some(Arc::clone(engine))
            }
            _ => None,
        };

        {
            let mut state = self.state.write().await;
            *state = match &previous_engine {
                Some(engine) => SessionState::Rebuilding(Arc::clone(engine)),
                None => SessionState::Initializing,
            };
        }
        info!(force_rebuild, "initializing session");

        let result = self.build_engine(force_rebuild, previous_engine.clone()).await;

        let mut state = self.state.write().await;
        match result {
            Ok(engine) => {
                *state = SessionState::Ready(engine);
                info!("session ready");
                Ok(())
            }
            Err(e) => {
                *state = match previous_engine {
                    Some(engine) => {
                        warn!(error = %e, "rebuild failed, keeping previous index");
                        SessionState::Ready(engine)
                    }
                    None => SessionState::Uninitialized,
                };
                Err(e)
            }
        }
    }

    /// Answer a question, initializing lazily if needed.
    ///
    /// Pipeline: retrieve → assemble prompt → generate. Generation failures
    /// come back as error text inside the answer, per the never-crash
    /// policy; only initialization problems surface as errors.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let engine = self.engine().await?;
        let prompt = engine.assemble(question).await?;
        Ok(engine.generation.answer(&prompt).await)
    }

    /// Answer a question as a fragment stream.
    ///
    /// Retrieval happens before the stream is returned, so the fragments,
    /// concatenated, match what [`ask`](ChatSession::ask) would produce for
    /// the same retrieval state and a deterministic backend.
    pub async fn ask_stream(&self, question: &str) -> Result<AnswerStream> {
        let engine = self.engine().await?;
        let prompt = engine.assemble(question).await?;
        Ok(engine.generation.answer_stream(&prompt).await)
    }

    /// Like [`ask_stream`](ChatSession::ask_stream), additionally resolving
    /// a transcript of the full reply once the stream has fully drained.
    ///
    /// The receiver fires exactly once, after the last fragment has been
    /// consumed, with reasoning tags stripped. This is the hook for kicking
    /// off speech synthesis without entangling it in the stream. If the
    /// stream is dropped early the receiver resolves to an error instead.
    pub async fn ask_stream_with_transcript(
        &self,
        question: &str,
    ) -> Result<(AnswerStream, oneshot::Receiver<String>)> {
        let inner = self.ask_stream(question).await?;
        let (tx, rx) = oneshot::channel();

        let stream = stream! {
            let mut inner = inner;
            let mut transcript = String::new();
            while let Some(fragment) = inner.next().await {
                transcript.push_str(&fragment);
                yield fragment;
            }
            let _ = tx.send(strip_reasoning(&transcript).to_string());
        };

        Ok((Box::pin(stream), rx))
    }

    async fn current_engine(&self) -> Option<Arc<Engine>> {
        match &*self.state.read().await {
            SessionState::Ready(engine) | SessionState::Rebuilding(engine) => {
                Some(Arc::clone(engine))
            }
            _ => None,
        }
    }

    async fn engine(&self) -> Result<Arc<Engine>> {
        if let Some(engine) = self.current_engine().await {
            return Ok(engine);
        }
        self.initialize(false).await?;
        self.current_engine()
            .await
            .ok_or_else(|| ChatError::Config("session did not reach ready state".to_string()))
    }

    /// Construct (or, on rebuild, reuse) the engine and bring the index up.
    async fn build_engine(
        &self,
        force_rebuild: bool,
        previous: Option<Arc<Engine>>,
    ) -> Result<Arc<Engine>> {
        let engine = match previous {
            Some(engine) => engine,
            None => Arc::new(self.construct_engine().await?),
        };

        let pipeline = engine.retriever.pipeline();
        if force_rebuild || !pipeline.index_exists() {
            let loader = DocumentLoader::new(&self.config.rag.docs_dir);
            let documents = tokio::task::spawn_blocking(move || loader.load())
                .await
                .map_err(|e| ChatError::Config(format!("document loading panicked: {e}")))??;
            pipeline.build_index(&documents, force_rebuild).await?;
        } else {
            pipeline.load_index().await?;
        }

        Ok(engine)
    }

    /// Build every component from configuration: embedding model, store,
    /// pipeline, generation backend, prompt template.
    async fn construct_engine(&self) -> Result<Engine> {
        let rag = &self.config.rag;

        let embedding_provider: Arc<dyn EmbeddingProvider> = match &self.embedding_override {
            Some(provider) => Arc::clone(provider),
            None => {
                let model_id = rag.embedding_model.clone();
                let provider = tokio::task::spawn_blocking(move || FastembedProvider::new(&model_id))
                    .await
                    .map_err(|e| ChatError::Config(format!("embedding load panicked: {e}")))??;
                Arc::new(provider)
            }
        };

        let store = Arc::new(SnapshotVectorStore::new(&rag.persist_dir));
        let chunker = Arc::new(RecursiveChunker::new(rag.chunk_size, rag.chunk_overlap));
        let pipeline = Arc::new(
            RagPipeline::builder()
                .config(rag.clone())
                .embedding_provider(embedding_provider)
                .store(store)
                .chunker(chunker)
                .build()?,
        );

        let llm = match &self.llm_override {
            Some(llm) => Arc::clone(llm),
            None => build_llm(&self.config.llm)?,
        };

        let template = PromptTemplate::load(
            &self.config.persona.system_message,
            self.config.persona.template_url.as_deref(),
        )
        .await;

        Ok(Engine {
            retriever: Retriever::new(pipeline),
            generation: GenerationClient::new(llm),
            template,
        })
    }
}

/// Builder injecting pre-built components into a [`ChatSession`].
pub struct ChatSessionBuilder {
    session: ChatSession,
}

impl ChatSessionBuilder {
    /// Use the given embedding provider instead of loading one from config.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.session.embedding_override = Some(provider);
        self
    }

    /// Use the given model backend instead of constructing one from config.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.session.llm_override = Some(llm);
        self
    }

    /// Finish the builder.
    pub fn build(self) -> ChatSession {
        self.session
    }
}
