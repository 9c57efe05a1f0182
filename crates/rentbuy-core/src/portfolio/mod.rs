pub mod batch;
pub mod city;
pub mod rates;
pub mod report;
