use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Labeled training example.
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,

    #[serde(default)]
    pub name: String
}

impl Sample {
    #[inline]
    pub fn new(input: impl Into<Vec<f64>>, target: impl Into<Vec<f64>>) -> Self {
        Self {
            input: input.into(),
            target: target.into(),
            name: String::new()
        }
    }

    #[inline]
    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = name.to_string();

        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered list of training examples.
pub struct Dataset {
    samples: Vec<Sample>
}

impl Dataset {
    #[inline]
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            samples: samples.into_iter().collect()
        }
    }

    /// Colors classification dataset: warm colors (target `1.0`)
    /// and cool colors (target `0.0`) in RGB format.
    pub fn colors() -> Self {
        const COLORS: [([f64; 3], f64, &str); 20] = [
            ([1.0, 0.0, 0.0], 1.0, "Pure Red"),
            ([1.0, 0.5, 0.0], 1.0, "Orange"),
            ([1.0, 1.0, 0.0], 1.0, "Yellow"),
            ([0.6, 0.0, 0.0], 1.0, "Dark Red"),
            ([1.0, 0.8, 0.6], 1.0, "Peach"),
            ([0.9, 0.2, 0.4], 1.0, "Crimson"),
            ([0.5, 0.2, 0.0], 1.0, "Brown"),
            ([1.0, 0.4, 0.4], 1.0, "Salmon"),

            ([0.0, 0.0, 1.0], 0.0, "Pure Blue"),
            ([0.0, 1.0, 0.0], 0.0, "Pure Green"),
            ([0.0, 1.0, 1.0], 0.0, "Cyan"),
            ([0.2, 0.4, 0.8], 0.0, "Sky Blue"),
            ([0.0, 0.3, 0.1], 0.0, "Forest Green"),
            ([0.5, 0.0, 0.5], 0.0, "Purple"),
            ([0.1, 0.1, 0.4], 0.0, "Navy"),
            ([0.7, 0.9, 1.0], 0.0, "Light Blue"),

            ([0.2, 0.2, 0.2], 0.0, "Dark Grey"),
            ([0.8, 0.8, 0.8], 1.0, "Light Grey"),
            ([0.0, 0.0, 0.0], 0.0, "Black"),
            ([1.0, 1.0, 1.0], 1.0, "White")
        ];

        Self::new(COLORS.iter().map(|(input, target, name)| {
            Sample::new(input.to_vec(), vec![*target]).with_name(name)
        }))
    }

    /// Parse dataset from a JSON array of samples.
    pub fn from_json(json: &str) -> NetworkResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| NetworkError::Format(err.to_string()))
    }

    /// Read dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> NetworkResult<Self> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path)
            .map_err(|err| NetworkError::io(path, err))?;

        let dataset = Self::from_json(&json)?;

        log::debug!("loaded {} samples from {path:?}", dataset.len());

        Ok(dataset)
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    /// Randomly reorder samples in place.
    pub fn shuffle(&mut self) {
        fastrand::shuffle(&mut self.samples);
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_dataset() {
        let dataset = Dataset::colors();

        assert_eq!(dataset.len(), 20);

        assert!(dataset.iter().all(|sample| sample.input.len() == 3 && sample.target.len() == 1));
        assert_eq!(dataset.iter().filter(|sample| sample.target[0] == 1.0).count(), 10);
    }

    #[test]
    fn shuffle_keeps_samples() {
        let mut dataset = Dataset::colors();

        dataset.shuffle();

        let mut names = dataset.iter()
            .map(|sample| sample.name.clone())
            .collect::<Vec<_>>();

        let mut expected = Dataset::colors().iter()
            .map(|sample| sample.name.clone())
            .collect::<Vec<_>>();

        names.sort();
        expected.sort();

        assert_eq!(names, expected);
    }

    #[test]
    fn parse_json() {
        let dataset = Dataset::from_json(r#"[
            { "input": [0.0, 1.0], "target": [1.0], "name": "first" },
            { "input": [1.0, 0.0], "target": [0.0] }
        ]"#).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[0].name, "first");
        assert_eq!(dataset.samples()[1], Sample::new([1.0, 0.0], [0.0]));

        assert!(matches!(Dataset::from_json(r#"[{ "input": [1.0] }]"#), Err(NetworkError::Format(_))));
    }
}
