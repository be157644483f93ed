//! Deprecated method step definitions.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use cucumber::{given, then, when, World};
use dont::{deprecations, DontError};

#[derive(Debug, Default)]
pub struct Car {
    manual_drives: AtomicU32,
}

#[deprecations(handler = "exception")]
impl Car {
    fn drive_autopilot(&self) -> String {
        "autopilot engaged".to_string()
    }

    #[dont_use]
    fn drive_manually(&self) -> String {
        self.manual_drives.fetch_add(1, Ordering::SeqCst);
        "driving manually".to_string()
    }
}

#[derive(Debug, Default)]
pub struct Loudspeaker;

#[deprecations(handler = "log_deprecated_call", dont_use(shout))]
impl Loudspeaker {
    fn shout(&self, msg: &str) -> String {
        msg.to_uppercase()
    }
}

/// Stand-in for a logger; keeps every warning it receives.
#[derive(Debug, Default)]
pub struct Logger {
    warnings: Mutex<Vec<String>>,
}

impl Logger {
    fn warn(&self, message: String) {
        self.warnings.lock().unwrap().push(message);
    }
}

/// Test context for deprecated method scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct MethodsWorld {
    car: Option<Car>,
    loudspeaker: Option<Loudspeaker>,
    logger: Arc<Logger>,
    outcome: Option<Result<String, DontError>>,
}

impl MethodsWorld {
    fn new() -> Self {
        Self {
            car: None,
            loudspeaker: None,
            logger: Arc::new(Logger::default()),
            outcome: None,
        }
    }

    fn car(&self) -> &Car {
        self.car.as_ref().expect("no car")
    }

    fn outcome(&mut self) -> Result<String, DontError> {
        self.outcome.take().expect("nothing was called")
    }
}

// --- Given steps ---

#[given("a car")]
async fn given_car(world: &mut MethodsWorld) {
    world.car = Some(Car::default());
}

#[given("a loudspeaker")]
async fn given_loudspeaker(world: &mut MethodsWorld) {
    world.loudspeaker = Some(Loudspeaker);
}

#[given(expr = "the {string} handler warns through a logger")]
async fn given_logging_handler(world: &mut MethodsWorld, name: String) {
    let logger = world.logger.clone();
    dont::register_handler(name, move |_receiver, method| {
        logger.warn(format!("Don't use '{}'.", method));
        Ok(())
    });
}

// --- When steps ---

#[when("I drive the car manually")]
async fn when_drive_manually(world: &mut MethodsWorld) {
    world.outcome = Some(world.car().drive_manually());
}

#[when("I drive the car on autopilot")]
async fn when_drive_autopilot(world: &mut MethodsWorld) {
    world.outcome = Some(Ok(world.car().drive_autopilot()));
}

#[when(expr = "I shout {string}")]
async fn when_shout(world: &mut MethodsWorld, msg: String) {
    let loudspeaker = world.loudspeaker.as_ref().expect("no loudspeaker");
    world.outcome = Some(loudspeaker.shout(&msg));
}

// --- Then steps ---

#[then(expr = "the call fails with {string}")]
async fn then_call_fails(world: &mut MethodsWorld, message: String) {
    let err = world.outcome().expect_err("call should fail");
    assert!(err.is_deprecation());
    assert_eq!(err.to_string(), message);
}

#[then("the call succeeds")]
async fn then_call_succeeds(world: &mut MethodsWorld) {
    assert!(world.outcome().is_ok());
}

#[then("the car was never driven manually")]
async fn then_never_driven(world: &mut MethodsWorld) {
    assert_eq!(world.car().manual_drives.load(Ordering::SeqCst), 0);
}

#[then(expr = "the result is {string}")]
async fn then_result_is(world: &mut MethodsWorld, expected: String) {
    assert_eq!(world.outcome().expect("call should succeed"), expected);
}

#[then(expr = "the logger received the warning {string}")]
async fn then_logger_warned(world: &mut MethodsWorld, expected: String) {
    assert_eq!(*world.logger.warnings.lock().unwrap(), vec![expected]);
}
