use crate::error::PluginError;

/// One host-visible float parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub default: f32,
}

impl ParamInfo {
    pub const fn new(name: &'static str, default: f32) -> Self {
        Self { name, default }
    }
}

/// Current parameter values, indexed like the plugin's `ParamInfo` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValues {
    values: Vec<f32>,
}

impl ParamValues {
    pub fn from_defaults(table: &[ParamInfo]) -> Self {
        Self {
            values: table.iter().map(|p| p.default).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<f32, PluginError> {
        self.values
            .get(index)
            .copied()
            .ok_or(PluginError::UnknownParam {
                index,
                count: self.values.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), PluginError> {
        let count = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(PluginError::UnknownParam { index, count })?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[ParamInfo] = &[ParamInfo::new("A", 0.25), ParamInfo::new("B", 1.0)];

    #[test]
    fn starts_at_defaults() {
        let p = ParamValues::from_defaults(TABLE);
        assert_eq!(p.len(), 2);
        assert_eq!(p.get(0).unwrap(), 0.25);
        assert_eq!(p.get(1).unwrap(), 1.0);
    }

    #[test]
    fn out_of_range_index_is_unknown_param() {
        let mut p = ParamValues::from_defaults(TABLE);
        assert!(matches!(
            p.get(2),
            Err(PluginError::UnknownParam { index: 2, count: 2 })
        ));
        assert!(p.set(7, 0.0).is_err());
        assert_eq!(p, ParamValues::from_defaults(TABLE));
    }
}
