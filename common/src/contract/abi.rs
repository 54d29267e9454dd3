use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Selector;

/// Argument description inside a message or constructor spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Callable entry point of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSpec {
    pub label: String,
    pub selector: Selector,
    #[serde(default)]
    pub mutates: bool,
    #[serde(default)]
    pub payable: bool,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl MessageSpec {
    /// Read-only message, selector derived from the label
    pub fn query(label: &str) -> Self {
        Self {
            label: label.to_string(),
            selector: Selector::from_label(label),
            mutates: false,
            payable: false,
            args: Vec::new(),
            return_type: None,
        }
    }

    /// State changing message, selector derived from the label
    pub fn tx(label: &str) -> Self {
        Self {
            mutates: true,
            ..Self::query(label)
        }
    }

    pub fn payable(mut self) -> Self {
        self.payable = true;
        self
    }

    pub fn arg(mut self, label: &str, type_name: &str) -> Self {
        self.args.push(ArgSpec {
            label: label.to_string(),
            type_name: type_name.to_string(),
        });
        self
    }

    pub fn returns(mut self, type_name: &str) -> Self {
        self.return_type = Some(type_name.to_string());
        self
    }
}

/// Contract metadata: the name, constructors and messages with their
/// selectors. This is what a client uses to build call data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAbi {
    pub name: String,
    pub version: String,
    constructors: IndexMap<String, MessageSpec>,
    messages: IndexMap<String, MessageSpec>,
}

impl ContractAbi {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            constructors: IndexMap::new(),
            messages: IndexMap::new(),
        }
    }

    pub fn with_constructor(mut self, spec: MessageSpec) -> Self {
        self.constructors.insert(spec.label.clone(), spec);
        self
    }

    pub fn with_message(mut self, spec: MessageSpec) -> Self {
        self.messages.insert(spec.label.clone(), spec);
        self
    }

    /// Look up a message by its fully qualified label
    pub fn find_message(&self, label: &str) -> Option<&MessageSpec> {
        self.messages.get(label)
    }

    pub fn find_message_by_selector(&self, selector: &Selector) -> Option<&MessageSpec> {
        self.messages.values().find(|m| m.selector == *selector)
    }

    pub fn find_constructor(&self, label: &str) -> Option<&MessageSpec> {
        self.constructors.get(label)
    }

    pub fn find_constructor_by_selector(&self, selector: &Selector) -> Option<&MessageSpec> {
        self.constructors.values().find(|m| m.selector == *selector)
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageSpec> {
        self.messages.values()
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MessageSpec> {
        self.constructors.values()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContractAbi {
        ContractAbi::new("sample", "1.0.0")
            .with_constructor(MessageSpec::tx("new").arg("min_delay", "u64"))
            .with_message(MessageSpec::query("Sample::get").returns("u64"))
            .with_message(
                MessageSpec::tx("Sample::set")
                    .payable()
                    .arg("value", "u64"),
            )
    }

    #[test]
    fn test_find_message() {
        let abi = sample();
        let set = abi.find_message("Sample::set").unwrap();
        assert!(set.mutates);
        assert!(set.payable);
        assert_eq!(set.selector, Selector::from_label("Sample::set"));
        assert!(abi.find_message("Sample::missing").is_none());
        assert_eq!(
            abi.find_message_by_selector(&set.selector).unwrap().label,
            "Sample::set"
        );
    }

    #[test]
    fn test_metadata_json() {
        let abi = sample();
        let json = abi.to_json().unwrap();
        let back = ContractAbi::from_json(&json).unwrap();
        assert_eq!(back, abi);
        let labels: Vec<_> = back.messages().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Sample::get", "Sample::set"]);
    }
}
