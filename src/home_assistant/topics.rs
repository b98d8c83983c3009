/// MQTT topic layout for one bridged device.
#[derive(Debug, Clone)]
pub struct Topics {
    discovery_prefix: String,
    topic_prefix: String,
    slug: String,
}

impl Topics {
    pub fn new(discovery_prefix: &str, topic_prefix: &str, device_name: &str) -> Self {
        Self {
            discovery_prefix: discovery_prefix.trim_end_matches('/').to_string(),
            topic_prefix: topic_prefix.trim_end_matches('/').to_string(),
            slug: slugify(device_name),
        }
    }

    pub fn topic_prefix(&self) -> &str {
        &self.topic_prefix
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn unique_id(&self, kind: &str) -> String {
        format!("ghlocal_{}_{}", self.slug, kind)
    }

    pub fn discovery(&self, unique_id: &str) -> String {
        format!("{}/sensor/{}/config", self.discovery_prefix, unique_id)
    }

    pub fn state(&self, kind: &str) -> String {
        format!("{}/{}/{}/state", self.topic_prefix, self.slug, kind)
    }

    pub fn attributes(&self, kind: &str) -> String {
        format!("{}/{}/{}/attributes", self.topic_prefix, self.slug, kind)
    }

    pub fn availability(&self) -> String {
        format!("{}/{}/availability", self.topic_prefix, self.slug)
    }

    pub fn delete_command(&self) -> String {
        format!("{}/{}/delete", self.topic_prefix, self.slug)
    }

    /// Home Assistant announces `online` here after it (re)starts.
    pub fn home_assistant_status(&self) -> String {
        format!("{}/status", self.discovery_prefix)
    }
}

/// Lowercase ASCII alphanumerics, every other run of characters becomes `_`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("device");
    }
    slug
}
