// Test modules for WharfDB


#[cfg(test)]
pub mod format_tests;




#[cfg(test)]
pub mod persistence_tests;

#[cfg(test)]
pub mod concurrency_tests;

#[cfg(test)]
pub mod memory_tests;
