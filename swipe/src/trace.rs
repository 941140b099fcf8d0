use libswipe::geom::Point;
use libswipe::TouchEvent;
use std::fs;
use std::path::Path;

use crate::error::Error;

/// A recorded list of touch events.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct TraceParsed {
    #[serde(default)]
    events: Vec<EventParsed>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct EventParsed {
    kind: String,
    #[serde(default)]
    slot: usize,
    x: Option<f64>,
    y: Option<f64>,
    time: f64,
}

impl EventParsed {
    fn pos(&self) -> Result<Point, String> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(format!("{} events need a position", self.kind)),
        }
    }

    fn to_event(&self) -> Result<TouchEvent, String> {
        let (slot, time) = (self.slot, self.time);
        match self.kind.as_str() {
            "down" => Ok(TouchEvent::Down { slot, pos: self.pos()?, time }),
            "motion" => Ok(TouchEvent::Motion { slot, pos: self.pos()?, time }),
            "up" => Ok(TouchEvent::Up { slot, time }),
            "cancel" => Ok(TouchEvent::Cancel { time }),
            k => Err(format!("unknown kind of event {:?}", k)),
        }
    }
}

pub fn parse_trace(contents: &str) -> Result<Vec<TouchEvent>, Error> {
    let t: TraceParsed = toml::from_str(contents)?;
    t.events
        .iter()
        .enumerate()
        .map(|(index, ev)| ev.to_event().map_err(|reason| Error::BadEvent { index, reason }))
        .collect()
}

/// Reads a list of touch events from `path`.
pub fn read_trace(path: &Path) -> Result<Vec<TouchEvent>, Error> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_trace(&contents).map_err(|e| e.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events() {
        let evs = parse_trace(
            r#"
            [[events]]
            kind = "down"
            x = 10.0
            y = 20.0
            time = 0.0

            [[events]]
            kind = "motion"
            slot = 1
            x = 15.0
            y = 20.0
            time = 16.0

            [[events]]
            kind = "up"
            time = 32.0

            [[events]]
            kind = "cancel"
            time = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(
            evs,
            vec![
                TouchEvent::Down { slot: 0, pos: Point::new(10.0, 20.0), time: 0.0 },
                TouchEvent::Motion { slot: 1, pos: Point::new(15.0, 20.0), time: 16.0 },
                TouchEvent::Up { slot: 0, time: 32.0 },
                TouchEvent::Cancel { time: 40.0 },
            ]
        );
    }

    #[test]
    fn empty_trace() {
        assert!(parse_trace("").unwrap().is_empty());
    }

    #[test]
    fn bad_events() {
        match parse_trace("[[events]]\nkind = \"down\"\nx = 1.0\ntime = 0.0\n") {
            Err(Error::BadEvent { index: 0, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        let s = "[[events]]\nkind = \"up\"\ntime = 0.0\n[[events]]\nkind = \"hover\"\ntime = 1.0\n";
        match parse_trace(s) {
            Err(Error::BadEvent { index: 1, ref reason }) => assert!(reason.contains("hover")),
            other => panic!("unexpected {:?}", other),
        }
        match parse_trace("[[events]]\nkind = \"up\"\n") {
            Err(Error::Toml(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
