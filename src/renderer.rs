//! Display abstraction for thermostat state.

use std::io::{self, Write};

#[cfg(any(test, feature = "testing"))]
use portable_atomic_util::Arc;
#[cfg(any(test, feature = "testing"))]
use spin::Mutex;

use crate::observer::{Observer, StateSnapshot};

/// Display abstraction for thermostat state.
///
/// Implement this trait to integrate a rendering system (terminal, canvas,
/// embedded display, etc.). `render` is called once per cycle and must
/// return promptly; anything slow belongs on the display's own thread.
///
/// Wrap a renderer in a [`View`] to attach it as an observer.
///
/// # Example
///
/// ```rust
/// use oxide_thermostat::Renderer;
///
/// struct Lamp { lit: bool }
///
/// impl Renderer for Lamp {
///     fn render(&mut self, _temperature: f64, _target: f64, heater_on: bool) {
///         self.lit = heater_on;
///     }
/// }
/// ```
pub trait Renderer {
    fn render(&mut self, temperature: f64, target_temperature: f64, heater_on: bool);
}

/// Observer that draws every snapshot through a [`Renderer`].
#[derive(Debug, Clone, Default)]
pub struct View<R>(pub R);

impl<R: Renderer> View<R> {
    pub fn new(renderer: R) -> Self {
        Self(renderer)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Renderer> Observer for View<R> {
    fn on_state_changed(&mut self, snapshot: &StateSnapshot) {
        self.0.render(
            snapshot.temperature,
            snapshot.target_temperature,
            snapshot.heater_on,
        );
    }
}

/// Prints one status line per render.
#[derive(Debug)]
pub struct ConsoleRenderer<W = io::Stdout> {
    label: String,
    out: W,
}

impl ConsoleRenderer {
    /// Renderer printing `[label] status` lines to standard output.
    pub fn stdout(label: impl Into<String>) -> Self {
        Self::new(label, io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(label: impl Into<String>, out: W) -> Self {
        Self {
            label: label.into(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Format the status line printed by [`ConsoleRenderer`].
pub fn status_line(temperature: f64, target_temperature: f64, heater_on: bool) -> String {
    let heater = if heater_on { "ON" } else { "OFF" };
    format!("Temp: {temperature:.1}°C (target {target_temperature:.1}°C) -> Heater: {heater}")
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, temperature: f64, target_temperature: f64, heater_on: bool) {
        let line = status_line(temperature, target_temperature, heater_on);
        if let Err(error) = writeln!(self.out, "[{}] {line}", self.label) {
            tracing::warn!(%error, label = %self.label, "failed to write status line");
        }
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test renderer that captures every rendered snapshot for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same capture storage, so keep one clone for
/// inspection and attach another inside a [`View`].
///
/// # Example
///
/// ```rust
/// use oxide_thermostat::{Observer, StateSnapshot, TestRenderer, View};
///
/// let renderer = TestRenderer::new();
/// let mut view = View::new(renderer.clone());
///
/// view.on_state_changed(&StateSnapshot {
///     temperature: 20.0,
///     target_temperature: 21.0,
///     heater_on: true,
/// });
///
/// renderer.with_renders(|renders| {
///     assert!(renders[0].heater_on);
/// });
/// ```
pub struct TestRenderer {
    renders: Arc<Mutex<Vec<StateSnapshot>>>,
}

#[cfg(any(test, feature = "testing"))]
impl Clone for TestRenderer {
    fn clone(&self) -> Self {
        Self {
            renders: self.renders.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Renderer for TestRenderer {
    fn render(&mut self, temperature: f64, target_temperature: f64, heater_on: bool) {
        self.renders.lock().push(StateSnapshot {
            temperature,
            target_temperature,
            heater_on,
        });
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for TestRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl TestRenderer {
    pub fn new() -> Self {
        Self {
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a boxed observer sharing this renderer's capture storage.
    pub fn boxed(&self) -> Box<dyn Observer + Send> {
        Box::new(View::new(self.clone()))
    }

    /// Get the number of renders that have occurred.
    pub fn count(&self) -> usize {
        self.renders.lock().len()
    }

    /// Temperatures and heater states in render order.
    pub fn trajectory(&self) -> Vec<(f64, bool)> {
        self.with_renders(|renders| {
            renders
                .iter()
                .map(|snapshot| (snapshot.temperature, snapshot.heater_on))
                .collect()
        })
    }

    /// Access the captured renders with a closure.
    pub fn with_renders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<StateSnapshot>) -> R,
    {
        let renders = self.renders.lock();
        f(&renders)
    }
}
