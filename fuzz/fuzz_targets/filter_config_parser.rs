#![no_main]

use blockscan::{models::FilterConfig, services::filter::FilterSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	if let Ok(configs) = serde_json::from_slice::<Vec<FilterConfig>>(data) {
		if let Ok(set) = FilterSet::try_from(configs.as_slice()) {
			assert_eq!(set.len(), configs.len());
			for filter in set.iter() {
				let _ = filter.to_string();
			}
		}
	}
});
