// # IP Source Trait
//
// Defines the interface for determining the current public IP address.
//
// ## Implementations
//
// - HTTP-based (IP echo services, plain text or JSON): `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     match source.current().await? {
//         Some(ip) => println!("current ip = {}", ip),
//         None => println!("no address in response"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// The address is returned as the text the source produced. It is not
/// trimmed or validated; it is compared byte-for-byte against the content
/// of the DNS record.
///
/// # Responsibilities
///
/// - ✅ Fetch and extract the address for one cycle
/// - ❌ Cache addresses between cycles
/// - ❌ Retry failed lookups (the next scheduled cycle is the retry)
/// - ❌ Decide whether DNS needs updating (owned by `DdnsEngine`)
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current IP address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: The current address
    /// - `Ok(None)`: The source answered, but did not contain a usable
    ///   address (e.g. the JSON value at the key path is not a string)
    /// - `Err(Error)`: The lookup failed and the cycle should be aborted
    async fn current(&self) -> Result<Option<String>, crate::Error>;

    /// Short name for logging
    fn source_name(&self) -> &'static str;
}
