extern crate app_dirs;
extern crate env_logger;
extern crate libswipe;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;
extern crate toml;

use app_dirs::AppInfo;
use libswipe::{Callbacks, Dispatcher, Tracker};
use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use crate::config::{Children, Config};
use crate::error::Error;

mod config;
mod error;
mod trace;

pub const APP_INFO: AppInfo = AppInfo {
    name: "swipe",
    author: "Joe Neeman",
};

fn dispatcher(config: Config, children: Rc<RefCell<Children>>) -> Dispatcher {
    let mut man = Dispatcher::new(config.thresholds, config.algorithm);
    man.set_gate(config.gate);

    let bindings = config.bindings;
    man.set_callbacks(Callbacks::new().on_swipe(move |direction, sample| {
        match direction {
            Some(d) => {
                println!("swipe {}", d);
                if let Some(action) = bindings.get(&d) {
                    children.borrow_mut().run(action);
                }
            }
            None => println!("no swipe"),
        }
        debug!("final sample: {:?}", sample);
    }));
    man
}

fn run() -> Result<(), Error> {
    let mut args = env::args_os().skip(1);
    let trace_path = PathBuf::from(args.next().ok_or(Error::Usage)?);
    let config = match args.next() {
        Some(p) => config::read_config(&PathBuf::from(p))?,
        None => config::open_config()?,
    };
    if args.next().is_some() {
        return Err(Error::Usage);
    }

    let events = trace::read_trace(&trace_path)?;
    info!("replaying {} events with the {:?} algorithm", events.len(), config.algorithm);

    let children = Rc::new(RefCell::new(Children::new()));
    let mut man = dispatcher(config, children.clone());
    let mut tracker = Tracker::new();
    for ev in &events {
        if let Some(stage) = tracker.update(ev) {
            man.handle(stage);
        }
    }
    if man.is_tracking() {
        warn!("the trace ended in the middle of a gesture");
    }

    let mut children = children.borrow_mut();
    if !children.is_empty() {
        info!("waiting for {} commands to finish", children.len());
    }
    children.wait();
    Ok(())
}

fn main() {
    if let Err(e) = env_logger::init() {
        eprintln!("unable to initialize logging: {}", e);
    }

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_directory_is_named_after_the_author() {
        assert!(env!("CARGO_PKG_AUTHORS").starts_with(APP_INFO.author));
        assert_ne!(APP_INFO.author, APP_INFO.name);
    }
}
