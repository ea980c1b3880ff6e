use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset, using {})", self.endpoint()),
        }
        match (self.timeout_secs, self.idle_timeout()) {
            (Some(_), None) => println!("  timeout-secs: 0 (wait indefinitely)"),
            (Some(secs), Some(_)) => println!("  timeout-secs: {secs}"),
            (None, Some(limit)) => println!("  timeout-secs: (unset, using {})", limit.as_secs()),
            (None, None) => println!("  timeout-secs: (unset)"),
        }
        match &self.greeting {
            Some(greeting) => println!("  greeting: {greeting}"),
            None => println!("  greeting: (default)"),
        }
        if self.services.is_empty() {
            println!("  services: (default) {}", self.services().join(", "));
        } else {
            println!("  services: {}", self.services.join(", "));
        }
    }
}
