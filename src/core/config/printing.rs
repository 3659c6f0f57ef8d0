use crate::core::config::data::{path_display, Config};
use std::path::Path;

impl Config {
    pub fn print_all(&self, path: Option<&Path>) {
        match path {
            Some(path) => println!("Current configuration ({}):", path_display(path)),
            None => println!("Current configuration:"),
        }
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset)"),
        }
        match &self.title {
            Some(title) => println!("  title: {title}"),
            None => println!("  title: (unset)"),
        }
        match self.thinking_indicator() {
            true => println!("  thinking-indicator: on"),
            false => println!("  thinking-indicator: off"),
        }
    }
}
