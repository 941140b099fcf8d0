use app_dirs::{get_app_root, AppDataType};
use libswipe::{Algorithm, AngularThresholds, Direction, EligibilityGate, OrthogonalThresholds, SwipeConfig};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::process;

use crate::error::Error;
use crate::APP_INFO;

fn parse_swipe(s: &[&str]) -> Option<Direction> {
    if s.len() != 1 {
        return None;
    }
    Direction::from_name(s[0])
}

fn parse_gesture(s: &str) -> Option<Direction> {
    let parts = s.split_whitespace().collect::<Vec<_>>();
    match parts.first() {
        Some(&"swipe") => parse_swipe(&parts[1..]),
        _ => None,
    }
}

fn parse_algorithm(s: &str) -> Option<Algorithm> {
    match s {
        "angular" => Some(Algorithm::Angular),
        "orthogonal" => Some(Algorithm::Orthogonal),
        _ => None,
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidThreshold { name, value })
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigParsed {
    algorithm: Option<String>,
    #[serde(default)]
    angular: AngularParsed,
    #[serde(default)]
    orthogonal: OrthogonalParsed,
    #[serde(default)]
    gate: GateParsed,
    #[serde(default)]
    bindings: Vec<BindingParsed>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct AngularParsed {
    velocity_threshold: Option<f64>,
    distance_threshold: Option<f64>,
    angle_threshold: Option<f64>,
    diagonal_swipe: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct OrthogonalParsed {
    velocity_threshold: Option<f64>,
    directional_offset_threshold: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct GateParsed {
    click_epsilon: Option<f64>,
}

impl ConfigParsed {
    fn to_config(self) -> Result<Config, Error> {
        let algorithm = match self.algorithm {
            Some(ref a) => parse_algorithm(a).ok_or_else(|| Error::UnknownAlgorithm(a.clone()))?,
            None => Algorithm::default(),
        };

        let a = AngularThresholds::default();
        let angular = AngularThresholds {
            velocity_threshold: check_threshold(
                "angular.velocity_threshold",
                self.angular.velocity_threshold.unwrap_or(a.velocity_threshold),
            )?,
            distance_threshold: check_threshold(
                "angular.distance_threshold",
                self.angular.distance_threshold.unwrap_or(a.distance_threshold),
            )?,
            angle_threshold: check_threshold(
                "angular.angle_threshold",
                self.angular.angle_threshold.unwrap_or(a.angle_threshold),
            )?,
            diagonal_swipe: self.angular.diagonal_swipe.unwrap_or(a.diagonal_swipe),
        };

        let o = OrthogonalThresholds::default();
        let orthogonal = OrthogonalThresholds {
            velocity_threshold: check_threshold(
                "orthogonal.velocity_threshold",
                self.orthogonal.velocity_threshold.unwrap_or(o.velocity_threshold),
            )?,
            directional_offset_threshold: check_threshold(
                "orthogonal.directional_offset_threshold",
                self.orthogonal.directional_offset_threshold.unwrap_or(o.directional_offset_threshold),
            )?,
        };

        let mut gate = EligibilityGate::new();
        if let Some(e) = self.gate.click_epsilon {
            gate = gate.click_epsilon(check_threshold("gate.click_epsilon", e)?);
        }

        let mut ret = Config {
            algorithm,
            thresholds: SwipeConfig { angular, orthogonal },
            gate,
            bindings: HashMap::new(),
        };

        for b in self.bindings {
            let (direction, action) = b.to_binding()?;
            if ret.bindings.insert(direction, action).is_some() {
                return Err(Error::DuplicateBinding(direction));
            }
        }

        Ok(ret)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
struct BindingParsed {
    gesture: String,
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

impl BindingParsed {
    fn to_binding(self) -> Result<(Direction, Action), Error> {
        let d = parse_gesture(&self.gesture).ok_or_else(|| Error::BadGesture(self.gesture.clone()))?;
        let action = Action::Command {
            command: self.command,
            args: self.args,
        };
        Ok((d, action))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub algorithm: Algorithm,
    pub thresholds: SwipeConfig,
    pub gate: EligibilityGate,
    pub bindings: HashMap<Direction, Action>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            algorithm: Algorithm::default(),
            thresholds: SwipeConfig::default(),
            gate: EligibilityGate::new(),
            bindings: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    Command {
        command: String,
        args: Vec<String>,
    }
}

impl Action {
    /// Starts the action, returning the process if one was started.
    pub fn run(&self) -> Option<process::Child> {
        match self {
            &Action::Command { ref command, ref args } => {
                let res = process::Command::new(command)
                    .args(args)
                    .spawn();
                match res {
                    Ok(child) => Some(child),
                    Err(e) => {
                        error!("failed to execute command {:?}: {}", command, e);
                        None
                    }
                }
            }
        }
    }
}

/// The commands that were started by bindings and that haven't been waited for yet.
#[derive(Debug, Default)]
pub struct Children {
    running: Vec<process::Child>,
}

impl Children {
    pub fn new() -> Children {
        Children::default()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Starts `action`, after collecting any earlier commands that have already exited.
    pub fn run(&mut self, action: &Action) {
        self.reap();
        if let Some(child) = action.run() {
            self.running.push(child);
        }
    }

    /// Collects the commands that have exited, without blocking.
    pub fn reap(&mut self) {
        let mut i = 0;
        while i < self.running.len() {
            match self.running[i].try_wait() {
                Ok(None) => i += 1,
                Ok(Some(status)) => {
                    let child = self.running.swap_remove(i);
                    report(&child, status);
                }
                Err(e) => {
                    let child = self.running.swap_remove(i);
                    warn!("couldn't check on command {}: {}", child.id(), e);
                }
            }
        }
    }

    /// Blocks until every command has exited.
    pub fn wait(&mut self) {
        for mut child in self.running.drain(..) {
            match child.wait() {
                Ok(status) => report(&child, status),
                Err(e) => warn!("couldn't wait for command {}: {}", child.id(), e),
            }
        }
    }
}

fn report(child: &process::Child, status: process::ExitStatus) {
    if status.success() {
        debug!("command {} finished", child.id());
    } else {
        warn!("command {} exited with {}", child.id(), status);
    }
}

pub fn parse_config(contents: &str) -> Result<Config, Error> {
    let c: ConfigParsed = toml::from_str(contents)?;
    c.to_config()
}

/// Reads the configuration from `path`.
pub fn read_config(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config(&contents).map_err(|e| e.in_file(path))
}

/// Reads the configuration from the user's config directory, falling back to the defaults if
/// there isn't one.
pub fn open_config() -> Result<Config, Error> {
    let mut file_name = get_app_root(AppDataType::UserConfig, &APP_INFO)?;
    file_name.push("config.toml");

    match fs::read_to_string(&file_name) {
        Ok(contents) => parse_config(&contents).map_err(|e| e.in_file(&file_name)),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            info!("no config file at {}, using the defaults", file_name.display());
            Ok(Config::default())
        }
        Err(e) => Err(Error::io(&file_name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn full_config() {
        let c = parse_config(
            r#"
            algorithm = "orthogonal"

            [angular]
            velocity_threshold = 0.5
            distance_threshold = 20.0
            angle_threshold = 10.0
            diagonal_swipe = false

            [orthogonal]
            velocity_threshold = 0.2
            directional_offset_threshold = 50.0

            [gate]
            click_epsilon = 8.0

            [[bindings]]
            gesture = "swipe up"
            command = "xdotool"
            args = ["key", "super"]

            [[bindings]]
            gesture = "swipe down-left"
            command = "true"
            "#,
        )
        .unwrap();

        assert_eq!(c.algorithm, Algorithm::Orthogonal);
        assert_eq!(c.thresholds.angular.velocity_threshold, 0.5);
        assert_eq!(c.thresholds.angular.distance_threshold, 20.0);
        assert_eq!(c.thresholds.angular.angle_threshold, 10.0);
        assert!(!c.thresholds.angular.diagonal_swipe);
        assert_eq!(c.thresholds.orthogonal.velocity_threshold, 0.2);
        assert_eq!(c.thresholds.orthogonal.directional_offset_threshold, 50.0);
        assert_eq!(c.gate, EligibilityGate::new().click_epsilon(8.0));
        assert_eq!(
            c.bindings[&Direction::Up],
            Action::Command {
                command: "xdotool".to_owned(),
                args: vec!["key".to_owned(), "super".to_owned()],
            }
        );
        assert_eq!(
            c.bindings[&Direction::DownLeft],
            Action::Command {
                command: "true".to_owned(),
                args: vec![],
            }
        );
    }

    #[test]
    fn partial_thresholds_keep_the_defaults() {
        let c = parse_config("[angular]\ndistance_threshold = 10.0\n").unwrap();
        assert_eq!(c.thresholds.angular.distance_threshold, 10.0);
        assert_eq!(c.thresholds.angular.velocity_threshold, 0.3);
        assert_eq!(c.thresholds.orthogonal, OrthogonalThresholds::default());
    }

    #[test]
    fn bad_configs() {
        match parse_config("algorithm = \"radial\"") {
            Err(Error::UnknownAlgorithm(ref a)) if a == "radial" => {}
            other => panic!("unexpected {:?}", other),
        }
        match parse_config("[angular]\nvelocity_threshold = -1.0") {
            Err(Error::InvalidThreshold { name, .. }) => assert_eq!(name, "angular.velocity_threshold"),
            other => panic!("unexpected {:?}", other),
        }
        match parse_config("[[bindings]]\ngesture = \"pinch in\"\ncommand = \"true\"") {
            Err(Error::BadGesture(ref g)) if g == "pinch in" => {}
            other => panic!("unexpected {:?}", other),
        }
        let dup = "[[bindings]]\ngesture = \"swipe up\"\ncommand = \"a\"\n\
                   [[bindings]]\ngesture = \"swipe  up\"\ncommand = \"b\"\n";
        match parse_config(dup) {
            Err(Error::DuplicateBinding(Direction::Up)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match parse_config("[angular]\nspeed = 1.0") {
            Err(Error::Toml(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn children_are_waited_for() {
        let mut children = Children::new();
        let ok = Action::Command { command: "true".to_owned(), args: vec![] };
        let missing = Action::Command { command: "/nonexistent/swipe-command".to_owned(), args: vec![] };

        children.run(&ok);
        children.run(&missing);
        assert_eq!(children.len(), 1);
        children.run(&ok);
        assert!(children.len() >= 1 && children.len() <= 2);

        children.wait();
        assert!(children.is_empty());
        children.reap();
        assert!(children.is_empty());
    }

    #[test]
    fn gestures() {
        assert_eq!(parse_gesture("swipe right"), Some(Direction::Right));
        assert_eq!(parse_gesture("  swipe   up-left "), Some(Direction::UpLeft));
        assert_eq!(parse_gesture("swipe"), None);
        assert_eq!(parse_gesture("swipe up down"), None);
        assert_eq!(parse_gesture(""), None);
    }
}
