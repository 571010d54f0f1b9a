//! Throughput metric naming.

use cloudwire_core::SdkRequest;

use crate::ClientConfiguration;

/// Service namespace with a throughput metric family.
pub const S3_SERVICE_NAME: &str = "Amazon S3";

/// Names a throughput metric and the byte-count metric paired with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThroughputMetricType {
    /// Throughput metric name, e.g. `S3UploadThroughput`.
    pub name: String,
    /// Service namespace the metric belongs to.
    pub service_name: String,
    /// Byte count metric name, e.g. `S3UploadByteCount`.
    pub byte_count_metric_name: String,
}

/// Guess the throughput metric for `request` from its service namespace.
///
/// Returns `None` when metrics are disabled in `config` or the namespace has
/// no throughput metrics.
pub fn guess_throughput_metric_type<I>(
    config: &ClientConfiguration,
    request: &SdkRequest<'_, I>,
    metric_suffix: &str,
    byte_count_suffix: &str,
) -> Option<ThroughputMetricType> {
    if !config.is_metrics_enabled() {
        return None;
    }
    match request.service_name() {
        S3_SERVICE_NAME => Some(ThroughputMetricType {
            name: format!("S3{metric_suffix}"),
            service_name: S3_SERVICE_NAME.to_string(),
            byte_count_metric_name: format!("S3{byte_count_suffix}"),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_metric_type() {
        let config = ClientConfiguration::new().metrics_enabled(true);
        let input = ();
        let request = SdkRequest::new(S3_SERVICE_NAME, "PutObject", &input);
        let metric =
            guess_throughput_metric_type(&config, &request, "UploadThroughput", "UploadByteCount")
                .unwrap();
        assert_eq!(metric.name, "S3UploadThroughput");
        assert_eq!(metric.service_name, "Amazon S3");
        assert_eq!(metric.byte_count_metric_name, "S3UploadByteCount");
    }

    #[test]
    fn test_disabled_metrics() {
        let config = ClientConfiguration::new();
        let input = ();
        let request = SdkRequest::new(S3_SERVICE_NAME, "PutObject", &input);
        assert!(guess_throughput_metric_type(&config, &request, "A", "B").is_none());
    }

    #[test]
    fn test_unknown_namespace() {
        let config = ClientConfiguration::new().metrics_enabled(true);
        let input = ();
        let request = SdkRequest::new("AmazonDynamoDBv2", "GetItem", &input);
        assert!(guess_throughput_metric_type(&config, &request, "A", "B").is_none());
    }
}
