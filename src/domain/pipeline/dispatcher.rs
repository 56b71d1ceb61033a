//! Request dispatcher - routes a request to its single handler through validation

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::request::{ensure_not_cancelled, Request, RequestHandler};
use super::validation::{join_violations, ValidationStage, Validator};
use crate::domain::{DomainError, Outcome};

/// Handler plus validators registered for one request type
struct Route<R: Request> {
    handler: Option<Arc<dyn RequestHandler<R>>>,
    stage: ValidationStage<R>,
}

impl<R: Request> Route<R> {
    fn empty() -> Self {
        Self {
            handler: None,
            stage: ValidationStage::new(Vec::new()),
        }
    }
}

/// Slot in the type-erased route table
struct RouteSlot {
    name: &'static str,
    has_handler: bool,
    route: Box<dyn Any + Send + Sync>,
}

/// Explicit registration table assembled once at process start
#[derive(Default)]
pub struct DispatcherBuilder {
    routes: HashMap<TypeId, RouteSlot>,
    errors: Vec<String>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the handler for request type `R`. A second binding is rejected by [`build`](Self::build).
    pub fn handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let slot = self.slot::<R>();

        if slot.has_handler {
            let name = slot.name;
            self.errors
                .push(format!("Handler for request '{}' already registered", name));
            return self;
        }

        slot.has_handler = true;

        if let Some(route) = slot.route.downcast_mut::<Route<R>>() {
            route.handler = Some(Arc::new(handler));
        }

        self
    }

    /// Add a validator for request type `R`; all of them run on every send
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        if let Some(route) = self.slot::<R>().route.downcast_mut::<Route<R>>() {
            route.stage.push(Arc::new(validator));
        }

        self
    }

    /// Finish registration, failing on duplicates or validators without a handler
    pub fn build(self) -> Result<Dispatcher, DomainError> {
        let mut errors = self.errors;

        let mut orphaned: Vec<&str> = self
            .routes
            .values()
            .filter(|slot| !slot.has_handler)
            .map(|slot| slot.name)
            .collect();
        orphaned.sort_unstable();

        for name in orphaned {
            errors.push(format!(
                "Validators registered for request '{}' without a handler",
                name
            ));
        }

        if !errors.is_empty() {
            return Err(DomainError::configuration(errors.join("; ")));
        }

        let mut names: Vec<&'static str> = self.routes.values().map(|slot| slot.name).collect();
        names.sort_unstable();

        info!(requests = ?names, "Request dispatcher ready");

        Ok(Dispatcher {
            routes: Arc::new(
                self.routes
                    .into_iter()
                    .map(|(type_id, slot)| (type_id, slot.route))
                    .collect(),
            ),
            names: Arc::new(names),
        })
    }

    fn slot<R: Request>(&mut self) -> &mut RouteSlot {
        self.routes
            .entry(TypeId::of::<R>())
            .or_insert_with(|| RouteSlot {
                name: R::NAME,
                has_handler: false,
                route: Box::new(Route::<R>::empty()),
            })
    }
}

/// Routes each request to exactly one handler, validating it first.
///
/// Cheap to clone; every `send` is independent of every other.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    names: Arc<Vec<&'static str>>,
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("requests", &self.names)
            .finish()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Names of every routable request type, sorted
    pub fn registered(&self) -> &[&'static str] {
        &self.names
    }

    /// Validate `request` and, if clean, run its handler.
    ///
    /// Returns the handler's outcome unchanged. Validation violations become
    /// a single `Failure` and the handler is never invoked. Faults are not
    /// caught or retried. Cancellation yields `Err(DomainError::Cancelled)`.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<Outcome<R::Response>, DomainError> {
        ensure_not_cancelled(cancel)?;

        let route = self
            .routes
            .get(&TypeId::of::<R>())
            .and_then(|route| route.downcast_ref::<Route<R>>())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "No handler registered for request '{}'",
                    R::NAME
                ))
            })?;

        let handler = route.handler.as_ref().ok_or_else(|| {
            DomainError::configuration(format!(
                "No handler registered for request '{}'",
                R::NAME
            ))
        })?;

        let violations = route.stage.run(&request);

        if !violations.is_empty() {
            warn!(
                request = R::NAME,
                violations = violations.len(),
                "Request rejected by validation"
            );
            return Ok(Outcome::failure(join_violations(&violations)));
        }

        debug!(request = R::NAME, "Dispatching request");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(request = R::NAME, "Request cancelled");
                Err(DomainError::Cancelled)
            }
            result = handler.handle(request, cancel) => result,
        }
    }
}
