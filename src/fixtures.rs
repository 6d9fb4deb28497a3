#[cfg(test)]
pub mod test {
    use crate::source::split_lines;
    use crate::types::RawLine;

    /// A chart values file in the shape helmflat is meant for.
    pub const VALUES: &str = "\
replicaCount: 2

image:
  repository: nginx
  pullPolicy: IfNotPresent
  # Overrides the image tag.
  tag: \"1.25.3\"

service:
  type: ClusterIP
  port: 80

ingress:
  enabled: true
  hosts:
    - host: chart-example.local
      paths:
        - path: /
          pathType: ImplementationSpecific

resources:
  limits:
    cpu: 100m
    memory: 128Mi
";

    /// Expected `(key, value)` pairs for [`VALUES`], in order.
    pub const VALUES_ENTRIES: &[(&str, &str)] = &[
        ("replicaCount", "2"),
        ("image.repository", "nginx"),
        ("image.pullPolicy", "IfNotPresent"),
        ("image.tag", "1.25.3"),
        ("service.type", "ClusterIP"),
        ("service.port", "80"),
        ("ingress.enabled", "true"),
        ("ingress.hosts.host", "chart-example.local"),
        ("ingress.hosts.host.paths.path", "/"),
        ("ingress.hosts.host.paths.path.pathType", "ImplementationSpecific"),
        ("resources.limits.cpu", "100m"),
        ("resources.limits.memory", "128Mi"),
    ];

    pub fn lines(text: &str) -> Vec<RawLine> {
        split_lines(text)
    }

    #[test]
    fn fixture_splits_into_lines() {
        let lines = lines(VALUES);
        assert_eq!(lines[0].text, "replicaCount: 2");
        assert!(lines.iter().enumerate().all(|(i, l)| l.index == i));
    }
}
